//! Exact-size zlib inflation

use flate2::{Decompress, FlushDecompress, Status};
use tracing::trace;

use super::error::{DcxError, DcxResult};
use crate::source::ByteSource;

/// Size of each read from the source while inflating
pub const INPUT_CHUNK_SIZE: usize = 16 * 1024;

/// Inflate a zlib stream into a buffer of exactly `expected` bytes
///
/// The source must be positioned at the start of the stream. Succeeds only if
/// the stream ends exactly when `expected` bytes have been produced.
pub fn inflate_exact(source: &mut dyn ByteSource, expected: usize) -> DcxResult<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve_exact(expected)
        .map_err(|_| DcxError::OutOfMemory {
            requested: expected,
        })?;

    let mut inflater = Decompress::new(true);
    let mut input = vec![0u8; INPUT_CHUNK_SIZE];

    loop {
        let n = source.read(&mut input)?;
        let mut pending = &input[..n];
        trace!("read {} compressed bytes, {} inflated so far", n, out.len());

        loop {
            let in_before = inflater.total_in();
            let out_before = inflater.total_out();
            let status = inflater.decompress_vec(pending, &mut out, FlushDecompress::None)?;
            let consumed = (inflater.total_in() - in_before) as usize;
            let written = inflater.total_out() - out_before;
            pending = &pending[consumed..];

            if out.len() > expected {
                return Err(DcxError::SizeOverflow { expected });
            }
            if status == Status::StreamEnd {
                return finish(out, expected);
            }
            if consumed > 0 || written > 0 {
                continue;
            }

            // No progress on this step
            if pending.is_empty() {
                break;
            }
            if out.len() == out.capacity() {
                return Err(DcxError::SizeOverflow { expected });
            }
            return Err(DcxError::Stalled {
                produced: out.len(),
            });
        }

        if n == 0 {
            if out.len() == expected && has_pending_output(&mut inflater) {
                return Err(DcxError::SizeOverflow { expected });
            }
            return Err(DcxError::TruncatedStream {
                produced: out.len(),
                expected,
            });
        }
    }
}

/// Whether the decoder still holds output beyond the declared size
fn has_pending_output(inflater: &mut Decompress) -> bool {
    let mut probe = [0u8; 1];
    let before = inflater.total_out();
    inflater
        .decompress(&[], &mut probe, FlushDecompress::Finish)
        .is_ok_and(|_| inflater.total_out() > before)
}

fn finish(out: Vec<u8>, expected: usize) -> DcxResult<Vec<u8>> {
    if out.len() != expected {
        return Err(DcxError::SizeMismatch {
            expected,
            actual: out.len(),
        });
    }
    Ok(out)
}
