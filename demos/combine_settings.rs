use std::collections::BTreeMap;

use agemix::calibration::transmission_rate_for_r0;
use agemix::io::contact_synth::synthetic_contact_matrix;
use agemix::{AgeCount, ContactMatrix, MixingConfig, MixingModel, Setting};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Toy population of 0-79 year olds; replace with the CSV loaders for real data.
    let ages: AgeCount = (0..80).map(|a| (a, 1_000.0 - 8.0 * a as f64)).collect();

    let cfg = MixingConfig {
        brackets: (0..16).map(|b| (5 * b, 5 * b + 4)).collect(),
        weights: [
            (Setting::Household, 4.11),
            (Setting::School, 11.41),
            (Setting::Work, 8.07),
            (Setting::Community, 2.79),
        ]
        .into_iter()
        .collect(),
        community_from_population: true,
    };
    let model = MixingModel::new(cfg)?;

    let household = synthetic_contact_matrix(80);
    let school = ContactMatrix::from_fn(80, |i, j| {
        if i.max(j) < 20 && i.abs_diff(j) <= 2 {
            5.0
        } else {
            0.0
        }
    });
    let working_age = 20..65;
    let work = ContactMatrix::from_fn(80, |i, j| {
        if working_age.contains(&i) && working_age.contains(&j) {
            1.0
        } else {
            0.0
        }
    });
    let matrices: BTreeMap<Setting, ContactMatrix> = [
        (Setting::Household, household),
        (Setting::School, school),
        (Setting::Work, work),
    ]
    .into_iter()
    .collect();

    let out = model.build(&ages, &matrices)?;

    let gamma = 1.0 / 5.0; // infectious mean 5 days
    let beta0 = transmission_rate_for_r0(&out.combined, gamma, 2.5)?;

    println!("bracket,population,contacts_per_day");
    for (label, (size, row)) in model
        .brackets()
        .labels()
        .iter()
        .zip(out.bracket_sizes.values().zip(out.combined.rows()))
    {
        println!("{},{:.0},{:.3}", label, size, row.iter().sum::<f64>());
    }
    println!("beta0 for R0=2.5: {:.6}", beta0);

    Ok(())
}
