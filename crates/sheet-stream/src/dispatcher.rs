//! Container detection.
//!
//! The first bytes of the source decide the decoder; nothing is parsed twice.

use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Error, Result};

/// ZIP local file header
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
/// OLE2 / Compound File Binary header
const OLE2_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Which container decoder a source goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Office Open XML package (.xlsx, .xlsm)
    Xlsx,
    /// BIFF8 workbook in a compound file (.xls)
    Xls,
}

impl ContainerKind {
    /// Classify a source by its signature, leaving it rewound to the start.
    ///
    /// Unrecognized content goes to the XLSX decoder, which reports the
    /// failure. A source shorter than a ZIP header is rejected up front.
    pub fn sniff<R: Read + Seek>(source: &mut R) -> Result<Self> {
        let start = source.stream_position()?;
        let mut magic = [0u8; 8];
        let mut filled = 0;
        while filled < magic.len() {
            match source.read(&mut magic[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
        source.seek(SeekFrom::Start(start))?;

        let kind = if filled == OLE2_MAGIC.len() && magic == OLE2_MAGIC {
            ContainerKind::Xls
        } else if filled >= ZIP_MAGIC.len() {
            if magic[..4] != ZIP_MAGIC {
                log::debug!("no known signature, trying XLSX");
            }
            ContainerKind::Xlsx
        } else {
            return Err(Error::UnsupportedFormat(format!(
                "source holds only {} bytes",
                filled
            )));
        };
        log::debug!("dispatching source to the {:?} decoder", kind);
        Ok(kind)
    }

    /// Classify a path by its extension. Only `.xls` is decided by name;
    /// `None` means the content decides.
    ///
    /// `.xlsx` files are sniffed too: legacy workbooks saved under that name
    /// and encrypted OOXML packages are both OLE2 containers.
    pub fn for_path(path: &Path) -> Option<Self> {
        let is_xls = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xls"));
        if !is_xls {
            return None;
        }
        log::debug!("dispatching {} to the Xls decoder", path.display());
        Some(ContainerKind::Xls)
    }
}
