//! Splitting large queries into requests and bundles.
//!
//! A query over `n` identifiers and `f` fields is split twice:
//!
//! 1. into bundle runs of `⌊500 / f⌋` identifiers, so each bundle stays
//!    within [`MAX_ITEMS_PER_BUNDLE`];
//! 2. each run into request chunks of `min(50, ⌊100 / f⌋)` identifiers, so
//!    each request stays within [`MAX_INSTRUMENTS_PER_REQUEST`] and
//!    [`MAX_ITEMS_PER_REQUEST`].
//!
//! Chunks are taken first-come, so identical input always yields the same
//! call plan and concatenating the chunks reproduces the input.

use tracing::debug;

use crate::models::{
    DataRequest, DataType, DateSpec, Instrument, RequestBundle, MAX_DATATYPES_PER_REQUEST,
    MAX_INSTRUMENTS_PER_REQUEST, MAX_ITEMS_PER_BUNDLE, MAX_ITEMS_PER_REQUEST,
};
use crate::{Error, Result};

/// Split an instrument into bundles of per-request instruments.
///
/// Each inner list is the instrument pool of one bundle; each instrument in
/// it carries the original instrument's properties. An empty identifier list
/// yields no bundles.
///
/// # Example
///
/// ```
/// use dsws_client::batching::bundle_identifiers;
/// use dsws_client::models::Instrument;
///
/// let ids: Vec<String> = (0..120).map(|i| format!("ID{i}")).collect();
/// let bundles = bundle_identifiers(&Instrument::new(ids), 2).unwrap();
///
/// // 120 identifiers x 2 fields fit one bundle of three requests (50, 50, 20)
/// assert_eq!(bundles.len(), 1);
/// assert_eq!(bundles[0].len(), 3);
/// ```
///
/// # Errors
///
/// Returns [`Error::Validation`] when `field_count` is zero or exceeds the
/// per-request data type limit.
pub fn bundle_identifiers(
    instrument: &Instrument,
    field_count: usize,
) -> Result<Vec<Vec<Instrument>>> {
    if field_count == 0 {
        return Err(Error::Validation(
            "At least one data type is required".to_string(),
        ));
    }
    if field_count > MAX_DATATYPES_PER_REQUEST {
        return Err(Error::Validation(format!(
            "Number of fields ({}) exceeds the maximum of {}",
            field_count, MAX_DATATYPES_PER_REQUEST
        )));
    }

    let per_bundle = MAX_ITEMS_PER_BUNDLE / field_count;
    let bundles: Vec<Vec<Instrument>> = instrument
        .identifiers()
        .chunks(per_bundle)
        .map(|run| split_bundle_identifiers(instrument, run, field_count))
        .collect();

    debug!(
        identifiers = instrument.identifiers().len(),
        field_count,
        bundles = bundles.len(),
        "planned request bundles"
    );

    Ok(bundles)
}

/// Split one bundle run into per-request instruments.
fn split_bundle_identifiers(
    template: &Instrument,
    run: &[String],
    field_count: usize,
) -> Vec<Instrument> {
    let per_request = MAX_INSTRUMENTS_PER_REQUEST.min(MAX_ITEMS_PER_REQUEST / field_count);
    run.chunks(per_request)
        .map(|chunk| template.with_identifiers(chunk))
        .collect()
}

/// Build validated bundles for an instrument, a field list and a date spec.
///
/// Every request of every bundle shares the same data types, date and tag.
pub fn build_bundles(
    instrument: &Instrument,
    data_types: &[DataType],
    date: DateSpec,
    tag: Option<&str>,
) -> Result<Vec<RequestBundle>> {
    bundle_identifiers(instrument, data_types.len())?
        .into_iter()
        .map(|pool| {
            let requests = pool
                .into_iter()
                .map(|chunk| {
                    DataRequest::new(chunk, data_types.to_vec(), date, tag.map(str::to_string))
                })
                .collect::<Result<Vec<_>>>()?;
            RequestBundle::new(requests)
        })
        .collect()
}
