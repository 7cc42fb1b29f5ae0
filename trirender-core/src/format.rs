/// Parser for the raw triangle record format.
///
/// Layout, little-endian, no header:
///
/// ```text
/// i32            vertex count N
/// N x [f32; 4]   vertex records (x, y, z, reserved)
/// N x [f32; 4]   normal records (x, y, z, reserved)
/// ```
use nom::{
    multi::count,
    number::complete::{le_f32, le_i32},
    sequence::tuple,
    IResult,
};

/// Size in bytes of one record (four f32 values)
pub const RECORD_SIZE: usize = 16;
const COUNT_SIZE: usize = 4;

/// Records read straight from a file, before packing
#[derive(Debug, Clone, PartialEq)]
pub struct RawMesh {
    pub vertices: Vec<[f32; 4]>,
    pub normals: Vec<[f32; 4]>,
    /// Bytes left after the declared records
    pub trailing: usize,
}

impl RawMesh {
    pub fn count(&self) -> usize {
        self.vertices.len()
    }
}

/// Parse a whole mesh file already held in memory.
///
/// Errors are plain strings; the loader attaches the file path.
pub fn parse_mesh(data: &[u8]) -> Result<RawMesh, String> {
    let (rest, declared) =
        parse_count(data).map_err(|_| format!("file too small for a vertex count ({} bytes)", data.len()))?;

    if declared < 0 {
        return Err(format!("negative vertex count {}", declared));
    }
    let n = declared as usize;
    if n % 3 != 0 {
        return Err(format!("vertex count {} is not a multiple of 3", n));
    }

    let expected = n
        .checked_mul(2 * RECORD_SIZE)
        .ok_or_else(|| format!("vertex count {} is too large", n))?;
    if rest.len() < expected {
        return Err(format!(
            "truncated data: {} vertices need {} bytes, got {}",
            n,
            expected + COUNT_SIZE,
            data.len()
        ));
    }

    let (rest, (vertices, normals)) = tuple((count(parse_record, n), count(parse_record, n)))(rest)
        .map_err(|e| format!("failed to read records: {:?}", e))?;

    Ok(RawMesh {
        vertices,
        normals,
        trailing: rest.len(),
    })
}

fn parse_count(input: &[u8]) -> IResult<&[u8], i32> {
    le_i32(input)
}

fn parse_record(input: &[u8]) -> IResult<&[u8], [f32; 4]> {
    let (input, (x, y, z, reserved)) = tuple((le_f32, le_f32, le_f32, le_f32))(input)?;
    Ok((input, [x, y, z, reserved]))
}

/// Encode records in the on-disk layout. Only used to build fixtures.
#[cfg(test)]
pub(crate) fn encode_mesh(vertices: &[[f32; 4]], normals: &[[f32; 4]]) -> Vec<u8> {
    assert_eq!(vertices.len(), normals.len());
    let mut data = Vec::with_capacity(COUNT_SIZE + 2 * RECORD_SIZE * vertices.len());
    data.extend_from_slice(&(vertices.len() as i32).to_le_bytes());
    for record in vertices.iter().chain(normals) {
        for value in record {
            data.extend_from_slice(&value.to_le_bytes());
        }
    }
    data
}
