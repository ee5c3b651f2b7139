//! Finding resource bytes through a KEY file

use nwn_common::ResourceType;
use tracing::trace;

use crate::{
    bif::{Bif, BifResource},
    key::Key,
};

/// Find a resource listed by `key` in the BIF files it references
///
/// `bifs` must be in the order of [`Key::bifs`]. Returns `None` when the resource is not listed,
/// its BIF is not loaded, or the BIF does not hold its id.
pub fn resolve<'b, 'd>(
    key: &Key,
    bifs: &'b [Bif<'d>],
    resref: impl AsRef<[u8]>,
    res_type: ResourceType,
) -> Option<&'b BifResource<'d>> {
    let resource = key.locate(resref, res_type)?;

    let Some(bif) = bifs.get(resource.bif_index()) else {
        trace!(
            resref = %resource.resref,
            bif = resource.bif_index(),
            loaded = bifs.len(),
            "bif is not loaded"
        );
        return None;
    };

    bif.get(resource.bif_resource_id())
}
