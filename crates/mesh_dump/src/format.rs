use std::fs;
use std::path::Path;

use crate::error::{CountField, MeshDumpError};

/// Size of the count header in bytes (five `i32`s).
pub const HEADER_SIZE: usize = 20;

/// Size of a single payload scalar (`f32` or `i32`).
const SCALAR_SIZE: usize = 4;

/// Decoded mesh dump. Vertex data is grouped into tuples; triangle indices
/// are validated against the vertex count before they get here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDump {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
}

impl MeshDump {
    /// Scalar counts in header order.
    fn counts(&self) -> [usize; 5] {
        [
            self.vertices.len() * 3,
            self.triangles.len(),
            self.uvs.len() * 2,
            self.normals.len() * 3,
            self.colors.len() * 4,
        ]
    }
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn read_scalars(bytes: &[u8]) -> impl Iterator<Item = f32> + '_ {
    bytes
        .chunks_exact(SCALAR_SIZE)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
}

fn read_vec3s(bytes: &[u8]) -> Vec<[f32; 3]> {
    let scalars: Vec<f32> = read_scalars(bytes).collect();
    scalars
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect()
}

/// Parse the header, returning scalar counts in header order.
fn decode_header(bytes: &[u8]) -> Result<[usize; 5], MeshDumpError> {
    if bytes.len() < HEADER_SIZE {
        return Err(MeshDumpError::Truncated {
            expected: HEADER_SIZE,
            found: bytes.len(),
        });
    }

    let mut counts = [0usize; 5];
    for (i, field) in CountField::ALL.iter().enumerate() {
        let value = read_i32(bytes, i * SCALAR_SIZE);
        if value < 0 {
            return Err(MeshDumpError::NegativeCount {
                field: *field,
                value,
            });
        }
        let count = value as usize;
        if count % field.stride() != 0 {
            return Err(MeshDumpError::Misaligned {
                field: *field,
                count,
            });
        }
        counts[i] = count;
    }
    Ok(counts)
}

/// Decode a full dump from bytes.
pub fn decode(bytes: &[u8]) -> Result<MeshDump, MeshDumpError> {
    let counts = decode_header(bytes)?;

    let payload: usize = counts.iter().sum::<usize>() * SCALAR_SIZE;
    let expected = HEADER_SIZE + payload;
    if bytes.len() < expected {
        return Err(MeshDumpError::Truncated {
            expected,
            found: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(MeshDumpError::TrailingBytes {
            extra: bytes.len() - expected,
        });
    }

    // Slice each section in header order.
    let mut sections: Vec<&[u8]> = Vec::with_capacity(5);
    let mut offset = HEADER_SIZE;
    for count in counts {
        let len = count * SCALAR_SIZE;
        sections.push(&bytes[offset..offset + len]);
        offset += len;
    }

    let vertices = read_vec3s(sections[0]);

    let mut triangles = Vec::with_capacity(counts[1]);
    for chunk in sections[1].chunks_exact(SCALAR_SIZE) {
        let index = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        if index < 0 || index as usize >= vertices.len() {
            return Err(MeshDumpError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }
        triangles.push(index as u32);
    }

    let uv_scalars: Vec<f32> = read_scalars(sections[2]).collect();
    let uvs = uv_scalars.chunks_exact(2).map(|c| [c[0], c[1]]).collect();

    let normals = read_vec3s(sections[3]);

    let color_scalars: Vec<f32> = read_scalars(sections[4]).collect();
    let colors = color_scalars
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect();

    Ok(MeshDump {
        vertices,
        triangles,
        uvs,
        normals,
        colors,
    })
}

/// Encode a dump into the flat binary layout.
pub fn encode(dump: &MeshDump) -> Vec<u8> {
    let counts = dump.counts();
    let total = HEADER_SIZE + counts.iter().sum::<usize>() * SCALAR_SIZE;
    let mut out = Vec::with_capacity(total);

    for count in counts {
        out.extend_from_slice(&(count as i32).to_le_bytes());
    }
    for v in &dump.vertices {
        for s in v {
            out.extend_from_slice(&s.to_le_bytes());
        }
    }
    for &i in &dump.triangles {
        out.extend_from_slice(&(i as i32).to_le_bytes());
    }
    for uv in &dump.uvs {
        for s in uv {
            out.extend_from_slice(&s.to_le_bytes());
        }
    }
    for n in &dump.normals {
        for s in n {
            out.extend_from_slice(&s.to_le_bytes());
        }
    }
    for c in &dump.colors {
        for s in c {
            out.extend_from_slice(&s.to_le_bytes());
        }
    }
    out
}

/// Read and decode a dump file.
pub fn read_file(path: &Path) -> Result<MeshDump, MeshDumpError> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

/// Encode and write a dump file, replacing any existing file.
pub fn write_file(path: &Path, dump: &MeshDump) -> Result<(), MeshDumpError> {
    fs::write(path, encode(dump))?;
    Ok(())
}
