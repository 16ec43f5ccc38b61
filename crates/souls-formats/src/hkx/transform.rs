//! Rigid body transforms

use crate::error::OutOfBounds;
use crate::view::f32_at;
use binrw::Endian;

/// Row-major 4x4 matrix applied to row vectors
///
/// The translation lives in elements 12..15.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Matrix elements in file order
    pub m: [f32; 16],
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Size of a serialized matrix
    pub const SIZE: usize = 64;

    /// Identity matrix
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Pure translation
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut t = Self::IDENTITY;
        t.m[12] = x;
        t.m[13] = y;
        t.m[14] = z;
        t
    }

    /// Read 16 little-endian floats at `offset`
    pub fn read_at(buf: &[u8], offset: usize) -> Result<Self, OutOfBounds> {
        // Check the whole matrix up front so a partial read never happens
        crate::view::slice_at(buf, offset, Self::SIZE)?;
        let mut m = [0.0f32; 16];
        for (i, value) in m.iter_mut().enumerate() {
            *value = f32_at(buf, offset + 4 * i, Endian::Little)?;
        }
        Ok(Self { m })
    }

    /// Transform a point
    pub fn apply(&self, [x, y, z]: [f32; 3]) -> [f32; 3] {
        let m = &self.m;
        [
            x * m[0] + y * m[4] + z * m[8] + m[12],
            x * m[1] + y * m[5] + z * m[9] + m[13],
            x * m[2] + y * m[6] + z * m[10] + m[14],
        ]
    }
}
