//! Program image serialization.
//!
//! ```text
//! [MAGIC "OBVM"][VERSION: u32 big-endian][PAYLOAD]
//! ```
//!
//! The payload is little-endian u64s: n, q, the field count, N values per
//! field in [`Field::ALL`] order, then the register seeds and the memory
//! seeds, each section prefixed by its length.

use std::io::{self, Read, Write};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{VmError, WireError};
use crate::microcode::{encode_program, Field, Instruction};

pub const MAGIC: [u8; 4] = *b"OBVM";
pub const VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 8;

const MAX_LOG_N: u32 = 20;

/// Everything needed to rebuild an engine: ring parameters, microcode
/// fields and the initial register and memory contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramImage {
    pub n: usize,
    pub q: u64,
    pub fields: [Vec<u64>; Field::COUNT],
    pub registers: Vec<u64>,
    pub memory: Vec<u64>,
}

impl ProgramImage {
    pub fn new(
        n: usize,
        q: u64,
        program: &[Instruction],
        registers: Vec<u64>,
        memory: Vec<u64>,
    ) -> Result<Self, VmError> {
        for values in [&registers, &memory] {
            if values.len() > n {
                return Err(VmError::TooManyValues {
                    len: values.len(),
                    n,
                });
            }
        }
        Ok(Self {
            n,
            q,
            fields: encode_program(program, n)?,
            registers,
            memory,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), WireError> {
        writer.write_all(&MAGIC)?;
        writer.write_u32::<BigEndian>(VERSION)?;
        writer.write_u64::<LittleEndian>(self.n as u64)?;
        writer.write_u64::<LittleEndian>(self.q)?;
        writer.write_u64::<LittleEndian>(Field::COUNT as u64)?;
        for field in self.fields.iter() {
            for slot in 0..self.n {
                writer.write_u64::<LittleEndian>(field.get(slot).copied().unwrap_or(0))?;
            }
        }
        for values in [&self.registers, &self.memory] {
            writer.write_u64::<LittleEndian>(values.len() as u64)?;
            for v in values.iter() {
                writer.write_u64::<LittleEndian>(*v)?;
            }
        }
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, WireError> {
        let mut header: [u8; HEADER_SIZE] = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header).map_err(eof_as_too_short)?;
        let version: u32 = peek_version(&header)?;
        if version != VERSION {
            return Err(WireError::UnsupportedVersion {
                got: version,
                expected: VERSION,
            });
        }

        let n: u64 = read_u64(reader)?;
        if n < 2 || !n.is_power_of_two() || n > 1 << MAX_LOG_N {
            return Err(WireError::InvalidDegree(n));
        }
        let q: u64 = read_u64(reader)?;
        let count: u64 = read_u64(reader)?;
        if count != Field::COUNT as u64 {
            return Err(WireError::FieldCount {
                got: count,
                expected: Field::COUNT as u64,
            });
        }

        let n: usize = n as usize;
        let mut fields: [Vec<u64>; Field::COUNT] = std::array::from_fn(|_| vec![0u64; n]);
        for field in fields.iter_mut() {
            read_u64_into(reader, field)?;
        }

        let registers: Vec<u64> = read_section(reader, n)?;
        let memory: Vec<u64> = read_section(reader, n)?;

        Ok(Self {
            n,
            q,
            fields,
            registers,
            memory,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        let mut buf: Vec<u8> =
            Vec::with_capacity(HEADER_SIZE + 8 * (3 + Field::COUNT * self.n + 2 + 2 * self.n));
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let mut reader: &[u8] = bytes;
        Self::read_from(&mut reader)
    }
}

/// Reads the version from the header without decoding the payload.
pub fn peek_version(bytes: &[u8]) -> Result<u32, WireError> {
    if bytes.len() < HEADER_SIZE {
        return Err(WireError::TooShort);
    }
    if bytes[0..4] != MAGIC {
        return Err(WireError::InvalidMagic);
    }
    let version: [u8; 4] = [bytes[4], bytes[5], bytes[6], bytes[7]];
    Ok(u32::from_be_bytes(version))
}

fn eof_as_too_short(err: io::Error) -> WireError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => WireError::TooShort,
        _ => WireError::Io(err),
    }
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64, WireError> {
    reader
        .read_u64::<LittleEndian>()
        .map_err(eof_as_too_short)
}

fn read_u64_into<R: Read>(reader: &mut R, values: &mut [u64]) -> Result<(), WireError> {
    reader
        .read_u64_into::<LittleEndian>(values)
        .map_err(eof_as_too_short)
}

fn read_section<R: Read>(reader: &mut R, n: usize) -> Result<Vec<u64>, WireError> {
    let count: u64 = read_u64(reader)?;
    if count > n as u64 {
        return Err(WireError::ValueCount {
            count,
            n: n as u64,
        });
    }
    let mut values: Vec<u64> = vec![0u64; count as usize];
    read_u64_into(reader, &mut values)?;
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alu::opcode;

    fn image() -> ProgramImage {
        ProgramImage::new(
            8,
            17,
            &[
                Instruction::new(opcode::ADD).rs1(0).rs2(1).rd(2),
                Instruction::new(opcode::NOP).forward(0).backward(1),
            ],
            vec![2, 1],
            vec![9],
        )
        .unwrap()
    }

    #[test]
    fn round_trip() {
        let image: ProgramImage = image();
        let bytes: Vec<u8> = image.to_bytes().unwrap();
        assert_eq!(&bytes[0..4], b"OBVM");
        assert_eq!(peek_version(&bytes).unwrap(), VERSION);
        assert_eq!(bytes.len(), HEADER_SIZE + 8 * (3 + 10 * 8 + 1 + 2 + 1 + 1));
        assert_eq!(ProgramImage::from_bytes(&bytes).unwrap(), image);
    }

    #[test]
    fn header_errors() {
        let mut bytes: Vec<u8> = image().to_bytes().unwrap();
        assert!(matches!(
            ProgramImage::from_bytes(&bytes[..5]),
            Err(WireError::TooShort)
        ));
        assert!(matches!(
            ProgramImage::from_bytes(&bytes[..bytes.len() - 3]),
            Err(WireError::TooShort)
        ));

        bytes[7] = 2;
        assert!(matches!(
            ProgramImage::from_bytes(&bytes),
            Err(WireError::UnsupportedVersion {
                got: 2,
                expected: 1
            })
        ));

        bytes[0] = b'X';
        assert!(matches!(
            ProgramImage::from_bytes(&bytes),
            Err(WireError::InvalidMagic)
        ));
    }

    #[test]
    fn payload_errors() {
        let bytes: Vec<u8> = image().to_bytes().unwrap();

        let mut wrong_count: Vec<u8> = bytes.clone();
        wrong_count[HEADER_SIZE + 16] = 9;
        assert!(matches!(
            ProgramImage::from_bytes(&wrong_count),
            Err(WireError::FieldCount {
                got: 9,
                expected: 10
            })
        ));

        let mut wrong_degree: Vec<u8> = bytes.clone();
        wrong_degree[HEADER_SIZE] = 12;
        assert!(matches!(
            ProgramImage::from_bytes(&wrong_degree),
            Err(WireError::InvalidDegree(12))
        ));

        let mut too_many: Vec<u8> = bytes.clone();
        too_many[HEADER_SIZE + 8 * (3 + 10 * 8)] = 9;
        assert!(matches!(
            ProgramImage::from_bytes(&too_many),
            Err(WireError::ValueCount { count: 9, n: 8 })
        ));
    }

    #[test]
    fn rejects_oversized_sections() {
        assert!(matches!(
            ProgramImage::new(8, 17, &[], vec![0; 9], vec![]),
            Err(VmError::TooManyValues { len: 9, n: 8 })
        ));
        assert!(matches!(
            ProgramImage::new(8, 17, &[Instruction::new(opcode::NOP); 9], vec![], vec![]),
            Err(VmError::ProgramTooLarge { len: 9, n: 8 })
        ));
    }
}
