use tracing::{debug, warn};

use super::{flatten, ParseOptions, ParsedResponse};
use crate::models::DataResponse;
use crate::{Error, Result};

/// Flatten and merge many partial responses into one result.
///
/// A response that cannot be flattened because it is invalid (no dates,
/// mismatched shapes) is logged and skipped; its siblings still contribute.
/// Records and errors are appended in input order and metadata is merged
/// with [`Meta::merge`](super::Meta::merge).
///
/// # Errors
///
/// Decode errors are not contained and abort the aggregation.
pub fn aggregate<'a, I>(responses: I, options: ParseOptions) -> Result<ParsedResponse>
where
    I: IntoIterator<Item = &'a DataResponse>,
{
    let mut total = ParsedResponse::default();
    let mut skipped = 0usize;

    for response in responses {
        match flatten(response, options) {
            Ok(parsed) => total = total.merge(parsed),
            Err(Error::InvalidResponse(reason)) => {
                skipped += 1;
                warn!(
                    tag = response.tag.as_deref().unwrap_or_default(),
                    "Invalid response, skipping"
                );
                debug!(%reason, "skipped response");
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        records = total.records.len(),
        errors = total.errors.len(),
        skipped,
        "aggregated responses"
    );

    Ok(total)
}
