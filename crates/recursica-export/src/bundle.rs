//! Deterministic `.tar.gz` bundle of export artifacts.
//!
//! Entries keep artifact order, carry mode `0644`, and take their mtime
//! from the export timestamp, so identical inputs produce identical bytes.

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{Builder, Header};

/// Pack `(file name, bytes)` entries into a gzip-compressed tarball.
pub fn bundle<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a [u8])>,
    mtime: u64,
) -> std::io::Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);
    for (name, bytes) in entries {
        let mut header = Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(mtime);
        header.set_entry_type(tar::EntryType::Regular);
        builder.append_data(&mut header, name, bytes)?;
    }
    builder.into_inner()?.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn unpack(bytes: &[u8]) -> Vec<(String, String)> {
        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        archive
            .entries()
            .expect("entries")
            .map(|entry| {
                let mut entry = entry.expect("entry");
                let name = entry.path().expect("path").display().to_string();
                let mut body = String::new();
                entry.read_to_string(&mut body).expect("read entry");
                (name, body)
            })
            .collect()
    }

    #[test]
    fn bundle_preserves_order_and_contents() {
        let bytes = bundle(
            [("tokens.json", b"{}".as_slice()), ("a.css", b":root {}".as_slice())],
            1_700_000_000,
        )
        .expect("bundle");
        assert_eq!(
            unpack(&bytes),
            [
                ("tokens.json".to_string(), "{}".to_string()),
                ("a.css".to_string(), ":root {}".to_string()),
            ]
        );
    }

    #[test]
    fn bundle_is_deterministic() {
        let entries = [("brand.json", b"{\"brand\":{}}".as_slice())];
        assert_eq!(
            bundle(entries, 42).expect("first"),
            bundle(entries, 42).expect("second")
        );
    }
}
