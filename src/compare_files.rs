use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{DescribeIoError, DiffError};

const CHUNK_SIZE: usize = 8 * 1024;

/// Returns true if the two files differ in any byte.
///
/// Files of different lengths are reported as different without reading them; otherwise
/// both are read chunk by chunk, stopping at the first mismatch.
pub fn file_contents_differ(a: &Path, b: &Path) -> Result<bool, DiffError> {
    trace!("Comparing {:?} with {:?}", a, b);
    let mut file_a = File::open(a).describe_read(a)?;
    let mut file_b = File::open(b).describe_read(b)?;

    let len_a = file_a.metadata().describe_read(a)?.len();
    let len_b = file_b.metadata().describe_read(b)?.len();
    if len_a != len_b {
        trace!("Lengths differ: {} != {}", len_a, len_b);
        return Ok(true);
    }

    let mut buf_a = vec![0; CHUNK_SIZE];
    let mut buf_b = vec![0; CHUNK_SIZE];
    loop {
        let read_a = fill(&mut file_a, &mut buf_a).describe_read(a)?;
        let read_b = fill(&mut file_b, &mut buf_b).describe_read(b)?;

        if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
            return Ok(true);
        }

        // a short read means eof on both
        if read_a < CHUNK_SIZE {
            return Ok(false);
        }
    }
}

/// Reads until `buf` is full or the reader hits eof, returning the number of bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
