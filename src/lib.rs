pub mod calibration;
pub mod error;
pub mod io;
pub mod math;
pub mod model;

pub use error::{MixingError, Result};
pub use math::matrix::ContactMatrix;
pub use math::normalize::{norm_age_group, normalize};
pub use model::aggregate::{
    aggregate_ages, aggregate_conversion, AgeCount, BracketConversion, BracketCount,
};
pub use model::brackets::{age_by_brackets, AgeBrackets, AgeToBracket};
pub use model::contact::{
    aggregate_matrix, combine, symmetric_community_matrix, to_asymmetric, to_symmetric,
};
pub use model::identity::{ids_by_age, uids_by_age, Aged};
pub use model::mixing::{MixingConfig, MixingModel, MixingOutput};
pub use model::setting::Setting;
