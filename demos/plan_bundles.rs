//! Bundle planning example.
//!
//! Shows how a large identifier list is split into bundles and requests
//! without talking to the service.
//!
//! Run with: cargo run --example plan_bundles -- 1234 3

use chrono::NaiveDate;
use dsws_client::models::{DataType, DateSpec, Instrument};
use dsws_client::{build_bundles, Frequency};

fn main() -> dsws_client::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let identifiers: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(1234);
    let fields: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(3);

    let instrument = Instrument::from_list((0..identifiers).map(|i| format!("ID{:05}", i)));
    let data_types: Vec<DataType> = (0..fields).map(|i| DataType::new(format!("F{}", i))).collect();
    let date = DateSpec::time_series(
        NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(2020, 12, 31).expect("valid date"),
        Frequency::Monthly,
    );

    let bundles = build_bundles(&instrument, &data_types, date, Some("plan"))?;

    println!(
        "{} identifier(s) x {} field(s) -> {} bundle(s)",
        identifiers,
        fields,
        bundles.len()
    );
    for (i, bundle) in bundles.iter().enumerate() {
        let sizes: Vec<usize> = bundle
            .requests()
            .iter()
            .map(|r| r.instrument().identifiers().len())
            .collect();
        println!(
            "  bundle {:>3}: {:>2} request(s), {:>3} item(s), sizes {:?}",
            i,
            bundle.requests().len(),
            bundle.items(),
            sizes
        );
    }

    Ok(())
}
