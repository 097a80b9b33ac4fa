//! XMP packet wrapper check.
//!
//! An XMP packet embedded in a TIFF field is framed by an
//! `<?xpacket begin=...?>` header and an `<?xpacket end=...?>` trailer.

use memchr::memmem;

use crate::diagnostics::Diagnostics;
use crate::messages::xmp as msg;

pub const XPACKET_BEGIN: &[u8] = b"<?xpacket begin=";
pub const XPACKET_END: &[u8] = b"<?xpacket end=";

/// Check the packet wrapper of `data`.
///
/// A missing header is an error; a missing trailer after the header only a
/// warning.
pub fn check_xmp(data: &[u8], diagnostics: &mut Diagnostics) {
    let Some(begin) = memmem::Finder::new(XPACKET_BEGIN).find(data) else {
        diagnostics.error(msg::UNABLE_TO_FIND_XPACKET, &[]);
        return;
    };
    let rest = &data[begin + XPACKET_BEGIN.len()..];
    if memmem::Finder::new(XPACKET_END).find(rest).is_none() {
        diagnostics.warning(msg::MISSING_XPACKET_END, &[]);
    }
}
