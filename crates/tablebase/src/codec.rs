//! Binary tablebase file format.
//!
//! ```text
//! header  magic "TNYTB\0\x01\0" (8 bytes) | version u32 | count u64
//! row     key u64 | wdl u8 | dtm u16 | move u32          (15 bytes)
//! ```
//!
//! All integers are little endian, rows are packed without padding. A move
//! of 0 means "no move".

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tinyhouse_core::Move;
use tracing::debug;

use crate::error::{Result, TablebaseError};
use crate::retro::{TbRecord, Wdl};

pub const MAGIC: [u8; 8] = *b"TNYTB\0\x01\0";
pub const VERSION: u32 = 1;
pub const HEADER_LEN: usize = 20;
pub const ROW_LEN: usize = 15;

/// Writes `records` to `path` in the order given.
pub fn write(path: impl AsRef<Path>, records: &[TbRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    write_to(&mut w, records)?;
    w.flush()?;
    debug!(
        path = %path.display(),
        records = records.len(),
        bytes = HEADER_LEN + records.len() * ROW_LEN,
        "tablebase written"
    );
    Ok(())
}

/// Reads every record from `path`, in file order.
pub fn read(path: impl AsRef<Path>) -> Result<Vec<TbRecord>> {
    let path = path.as_ref();
    let mut r = BufReader::new(File::open(path)?);
    let records = read_from(&mut r)?;
    debug!(path = %path.display(), records = records.len(), "tablebase read");
    Ok(records)
}

pub fn write_to<W: Write>(w: &mut W, records: &[TbRecord]) -> Result<()> {
    let mut header = [0u8; HEADER_LEN];
    header[..8].copy_from_slice(&MAGIC);
    header[8..12].copy_from_slice(&VERSION.to_le_bytes());
    header[12..20].copy_from_slice(&(records.len() as u64).to_le_bytes());
    w.write_all(&header)?;

    let mut row = [0u8; ROW_LEN];
    for rec in records {
        row[0..8].copy_from_slice(&rec.key.to_le_bytes());
        row[8] = rec.wdl as u8;
        row[9..11].copy_from_slice(&rec.dtm.to_le_bytes());
        let mv = rec.best.map_or(0, Move::pack);
        row[11..15].copy_from_slice(&mv.to_le_bytes());
        w.write_all(&row)?;
    }
    Ok(())
}

pub fn read_from<R: Read>(r: &mut R) -> Result<Vec<TbRecord>> {
    let mut header = [0u8; HEADER_LEN];
    read_exact_or(r, &mut header, "truncated header")?;

    if header[..8] != MAGIC {
        return Err(format_err("bad magic"));
    }
    let version = u32::from_le_bytes(le_bytes(&header[8..12]));
    if version != VERSION {
        return Err(format_err(format!(
            "unsupported version {version}, expected {VERSION}"
        )));
    }
    let count = u64::from_le_bytes(le_bytes(&header[12..20]));

    let mut records = Vec::with_capacity(count.min(1 << 20) as usize);
    let mut row = [0u8; ROW_LEN];
    for i in 0..count {
        read_exact_or(r, &mut row, "truncated body")?;
        let key = u64::from_le_bytes(le_bytes(&row[0..8]));
        let wdl = Wdl::from_u8(row[8])
            .ok_or_else(|| format_err(format!("invalid wdl tag {} in row {i}", row[8])))?;
        let dtm = u16::from_le_bytes(le_bytes(&row[9..11]));
        let raw = u32::from_le_bytes(le_bytes(&row[11..15]));
        let best = match raw {
            0 => None,
            _ => Some(Move::unpack(raw).ok_or_else(|| {
                format_err(format!("undecodable move {raw:#x} in row {i}"))
            })?),
        };
        records.push(TbRecord {
            key,
            wdl,
            dtm,
            best,
        });
    }

    let mut extra = [0u8; 1];
    if r.read(&mut extra)? != 0 {
        return Err(format_err("trailing bytes after last record"));
    }
    Ok(records)
}

/// Sorts records by key, the order [`crate::Tablebase`] probes in.
pub fn sort_records(records: &mut [TbRecord]) {
    records.sort_unstable_by_key(|r| r.key);
}

fn read_exact_or<R: Read>(r: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => format_err(what),
        _ => TablebaseError::Io(e),
    })
}

fn le_bytes<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

fn format_err(msg: impl Into<String>) -> TablebaseError {
    TablebaseError::Format(msg.into())
}
