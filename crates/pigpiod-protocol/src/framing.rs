//! Fixed-header framing for daemon exchanges.
//!
//! Requests are a 16-byte header followed by the extension payload when one
//! is declared; responses are a 12-byte header followed by `status` bytes of
//! payload when the originating request declared a reply format.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use crate::error::{ProtocolError, ProtocolResult};
use crate::types::{ElementKind, Extension, Request, Response};

/// Request header size: command, p1, p2, extension length.
pub const REQUEST_HEADER_SIZE: usize = 16;

/// Response header size: echoed command, echoed p1, status.
pub const RESPONSE_HEADER_SIZE: usize = 12;

/// Encodes a request into its complete wire form, header and payload.
pub fn encode_request(request: &Request) -> Vec<u8> {
    let ext_len = request.extension.as_ref().map_or(0, Extension::byte_len);
    let mut buffer = Vec::with_capacity(REQUEST_HEADER_SIZE + ext_len);
    buffer.extend_from_slice(&request.command.code().to_le_bytes());
    buffer.extend_from_slice(&request.p1.to_le_bytes());
    buffer.extend_from_slice(&request.p2.to_le_bytes());
    buffer.extend_from_slice(&(ext_len as u32).to_le_bytes());
    if let Some(extension) = &request.extension {
        for &value in extension.values() {
            match extension.kind() {
                ElementKind::U8 => buffer.push(value as u8),
                ElementKind::U16 => buffer.extend_from_slice(&(value as u16).to_le_bytes()),
                ElementKind::U32 => buffer.extend_from_slice(&value.to_le_bytes()),
            }
        }
    }
    buffer
}

/// The fixed fields of a response header.
///
/// `command` and `p1` echo the request and are only useful for conformance
/// checks; `status` is the protocol-visible result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Echoed command code.
    pub command: u32,
    /// Echoed first parameter.
    pub p1: u32,
    /// Result status, negative on failure.
    pub status: i32,
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Parses the three-field response header.
///
/// # Errors
///
/// `InvalidHeader` when the slice is not exactly [`RESPONSE_HEADER_SIZE`]
/// bytes.
pub fn decode_header(bytes: &[u8]) -> ProtocolResult<ResponseHeader> {
    if bytes.len() != RESPONSE_HEADER_SIZE {
        return Err(ProtocolError::InvalidHeader {
            expected: RESPONSE_HEADER_SIZE,
            received: bytes.len(),
        });
    }
    Ok(ResponseHeader {
        command: u32_at(bytes, 0),
        p1: u32_at(bytes, 4),
        status: u32_at(bytes, 8) as i32,
    })
}

fn decode_extension(bytes: &[u8], kind: ElementKind) -> ProtocolResult<BTreeMap<u32, u32>> {
    let width = kind.width();
    if bytes.len() % width != 0 {
        return Err(ProtocolError::UnalignedExtension {
            len: bytes.len(),
            width,
        });
    }
    let mut elements = BTreeMap::new();
    for (index, chunk) in bytes.chunks_exact(width).enumerate() {
        let value = match kind {
            ElementKind::U8 => u32::from(chunk[0]),
            ElementKind::U16 => u32::from(u16::from_le_bytes([chunk[0], chunk[1]])),
            ElementKind::U32 => u32_at(chunk, 0),
        };
        elements.insert(index as u32 + 1, value);
    }
    Ok(elements)
}

/// Decodes a response from its header and payload bytes.
///
/// When the originating request declared a `reply_format` and the status is
/// non-negative, the payload must be exactly `status` bytes and is decoded
/// into 1-based positions. A failing status never carries a payload.
pub fn decode_response(
    header: &[u8],
    extension: &[u8],
    reply_format: Option<ElementKind>,
) -> ProtocolResult<Response> {
    let parsed = decode_header(header)?;
    match reply_format {
        Some(kind) if parsed.status >= 0 => {
            let declared = parsed.status as usize;
            if extension.len() != declared {
                return Err(ProtocolError::ExtensionLengthMismatch {
                    declared,
                    received: extension.len(),
                });
            }
            Ok(Response::with_extension(
                parsed.status,
                decode_extension(extension, kind)?,
            ))
        }
        _ => {
            if !extension.is_empty() {
                return Err(ProtocolError::ExtensionLengthMismatch {
                    declared: 0,
                    received: extension.len(),
                });
            }
            Ok(Response::new(parsed.status))
        }
    }
}

/// Writes framed requests to a byte stream.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: Write> FrameWriter<W> {
    /// Creates a new FrameWriter wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes a single request as one contiguous buffer.
    pub fn write_request(&mut self, request: &Request) -> ProtocolResult<()> {
        self.writer.write_all(&encode_request(request))?;
        self.writer.flush()?;
        Ok(())
    }

    /// Unwraps this FrameWriter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Reads framed responses from a byte stream.
pub struct FrameReader<R> {
    reader: R,
}

impl<R: Read> FrameReader<R> {
    /// Creates a new FrameReader wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads one complete response: the fixed header, then the payload the
    /// header declares when `reply_format` was set on the request.
    ///
    /// A connection that closes mid-frame surfaces as `Io` with
    /// `UnexpectedEof`, a transport failure rather than a protocol one.
    pub fn read_response(
        &mut self,
        reply_format: Option<ElementKind>,
    ) -> ProtocolResult<(ResponseHeader, Response)> {
        let mut header = [0u8; RESPONSE_HEADER_SIZE];
        self.reader.read_exact(&mut header)?;
        let parsed = decode_header(&header)?;

        let extension = if reply_format.is_some() && parsed.status > 0 {
            let mut payload = vec![0u8; parsed.status as usize];
            self.reader.read_exact(&mut payload)?;
            payload
        } else {
            Vec::new()
        };

        let response = decode_response(&header, &extension, reply_format)?;
        Ok((parsed, response))
    }

    /// Unwraps this FrameReader, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use std::io::Cursor;

    #[test]
    fn encode_simple_request() {
        let request = Request::simple(Command::Servo, 14, 1700);
        let bytes = encode_request(&request);
        assert_eq!(
            bytes,
            vec![8, 0, 0, 0, 14, 0, 0, 0, 164, 6, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn encode_negative_parameter() {
        let request = Request::simple(Command::Servo, 14, -1);
        let bytes = encode_request(&request);
        assert_eq!(&bytes[8..12], &[255, 255, 255, 255]);
    }

    #[test]
    fn encode_u32_extension() {
        let extension = Extension::new(ElementKind::U32, vec![32]).unwrap();
        let request = Request::with_extension(Command::Spio, 1, 32000, extension);
        let bytes = encode_request(&request);
        assert_eq!(
            bytes,
            vec![
                71, 0, 0, 0, 1, 0, 0, 0, 0, 125, 0, 0, 4, 0, 0, 0, 32, 0, 0, 0
            ]
        );
    }

    #[test]
    fn encode_byte_extension() {
        let extension = Extension::bytes(&[32, 64]).unwrap();
        let request = Request::with_extension(Command::Spiw, 49, 0, extension);
        let bytes = encode_request(&request);
        assert_eq!(&bytes[12..16], &[2, 0, 0, 0]);
        assert_eq!(&bytes[16..], &[32, 64]);
    }

    #[test]
    fn decode_success_header() {
        let header = [8, 0, 0, 0, 14, 0, 0, 0, 0, 0, 0, 0];
        let response = decode_response(&header, &[], None).unwrap();
        assert_eq!(response, Response::new(0));
    }

    #[test]
    fn decode_negative_status() {
        let header = [8, 0, 0, 0, 14, 0, 0, 0, 254, 255, 255, 255];
        let response = decode_response(&header, &[], None).unwrap();
        assert_eq!(response.status(), -2);
        assert!(!response.is_successful());
    }

    #[test]
    fn decode_byte_reply_extension() {
        let header = [73, 0, 0, 0, 49, 0, 0, 0, 3, 0, 0, 0];
        let response = decode_response(&header, &[16, 18, 19], Some(ElementKind::U8)).unwrap();
        assert_eq!(response.status(), 3);
        assert_eq!(
            response.extension(),
            Some(&BTreeMap::from([(1, 16), (2, 18), (3, 19)]))
        );
    }

    #[test]
    fn decode_u16_reply_extension() {
        let header = [73, 0, 0, 0, 49, 0, 0, 0, 4, 0, 0, 0];
        let response =
            decode_response(&header, &[64, 0, 0, 1], Some(ElementKind::U16)).unwrap();
        assert_eq!(
            response.extension(),
            Some(&BTreeMap::from([(1, 64), (2, 256)]))
        );
    }

    #[test]
    fn decode_length_mismatch() {
        let header = [73, 0, 0, 0, 49, 0, 0, 0, 4, 0, 0, 0];
        let result = decode_response(&header, &[16, 18], Some(ElementKind::U8));
        assert!(matches!(
            result,
            Err(ProtocolError::ExtensionLengthMismatch {
                declared: 4,
                received: 2
            })
        ));
    }

    #[test]
    fn decode_invalid_header_size() {
        let result = decode_response(&[0; 8], &[], None);
        assert!(matches!(
            result,
            Err(ProtocolError::InvalidHeader {
                expected: RESPONSE_HEADER_SIZE,
                received: 8
            })
        ));
    }

    #[test]
    fn frame_reader_simple_response() {
        let bytes = vec![8, 0, 0, 0, 14, 0, 0, 0, 0, 0, 0, 0];
        let mut reader = FrameReader::new(Cursor::new(bytes));
        let (header, response) = reader.read_response(None).unwrap();
        assert_eq!(header.command, 8);
        assert_eq!(header.p1, 14);
        assert_eq!(response, Response::new(0));
    }

    #[test]
    fn frame_reader_extension_response() {
        let mut bytes = vec![75, 0, 0, 0, 49, 0, 0, 0, 2, 0, 0, 0];
        bytes.extend_from_slice(&[64, 128]);
        let mut reader = FrameReader::new(Cursor::new(bytes));
        let (_, response) = reader.read_response(Some(ElementKind::U8)).unwrap();
        assert_eq!(response.extension_values(), vec![64, 128]);
    }

    #[test]
    fn frame_reader_failure_skips_extension_read() {
        let bytes = vec![75, 0, 0, 0, 49, 0, 0, 0, 231, 255, 255, 255];
        let mut reader = FrameReader::new(Cursor::new(bytes));
        let (_, response) = reader.read_response(Some(ElementKind::U8)).unwrap();
        assert_eq!(response.status(), -25);
        assert!(response.extension().is_none());
    }

    #[test]
    fn frame_reader_short_header_is_io_error() {
        let mut reader = FrameReader::new(Cursor::new(vec![8, 0, 0]));
        let result = reader.read_response(None);
        match result {
            Err(ProtocolError::Io(err)) => {
                assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn frame_reader_short_extension_is_io_error() {
        let bytes = vec![73, 0, 0, 0, 49, 0, 0, 0, 4, 0, 0, 0, 16];
        let mut reader = FrameReader::new(Cursor::new(bytes));
        let result = reader.read_response(Some(ElementKind::U8));
        assert!(matches!(result, Err(ProtocolError::Io(_))));
    }

    #[test]
    fn frame_writer_round_trip() {
        let extension = Extension::bytes(&[1, 2, 3]).unwrap();
        let request = Request::with_extension(Command::Spix, 49, 0, extension);

        let mut buffer = Vec::new();
        FrameWriter::new(&mut buffer).write_request(&request).unwrap();
        assert_eq!(buffer, encode_request(&request));
    }
}
