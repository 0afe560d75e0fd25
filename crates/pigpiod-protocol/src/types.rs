//! Request and response types for the daemon protocol.

use std::collections::BTreeMap;

use crate::command::Command;
use crate::error::{ProtocolError, ProtocolResult};

/// Width of a single extension element on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Unsigned byte.
    U8,
    /// Unsigned 16-bit, little-endian.
    U16,
    /// Unsigned 32-bit, little-endian.
    U32,
}

impl ElementKind {
    /// Element width in bytes.
    pub fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    fn fits(self, value: u32) -> bool {
        match self {
            Self::U8 => value <= u32::from(u8::MAX),
            Self::U16 => value <= u32::from(u16::MAX),
            Self::U32 => true,
        }
    }
}

/// Variable-length payload appended to a request header.
///
/// Elements share one declared width and are serialized in declaration
/// order. An extension is never empty; requests without a payload omit the
/// field entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    kind: ElementKind,
    values: Vec<u32>,
}

impl Extension {
    /// Builds an extension, validating element count and widths up front.
    ///
    /// # Errors
    ///
    /// `EmptyExtension` for zero elements, `ElementOutOfRange` for a value
    /// that does not fit the declared width.
    pub fn new(kind: ElementKind, values: Vec<u32>) -> ProtocolResult<Self> {
        if values.is_empty() {
            return Err(ProtocolError::EmptyExtension);
        }
        for &value in &values {
            if !kind.fits(value) {
                return Err(ProtocolError::ElementOutOfRange {
                    value,
                    width: kind.width(),
                });
            }
        }
        Ok(Self { kind, values })
    }

    /// Builds a byte-element extension from raw data.
    pub fn bytes(data: &[u8]) -> ProtocolResult<Self> {
        Self::new(ElementKind::U8, data.iter().map(|&b| u32::from(b)).collect())
    }

    /// The declared element width.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Elements in declaration order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Serialized payload length in bytes.
    pub fn byte_len(&self) -> usize {
        self.values.len() * self.kind.width()
    }
}

/// One command exchange as the caller describes it.
///
/// `reply_format` declares that the daemon answers with an extension payload
/// and how to decode its elements; without it the response status is the
/// whole result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Command to issue.
    pub command: Command,
    /// First command parameter.
    pub p1: i32,
    /// Second command parameter.
    pub p2: i32,
    /// Optional request payload.
    pub extension: Option<Extension>,
    /// Element format of the expected response payload, if any.
    pub reply_format: Option<ElementKind>,
}

impl Request {
    /// Creates a request with no payload in either direction.
    pub fn simple(command: Command, p1: i32, p2: i32) -> Self {
        Self {
            command,
            p1,
            p2,
            extension: None,
            reply_format: None,
        }
    }

    /// Creates a request carrying a payload.
    pub fn with_extension(command: Command, p1: i32, p2: i32, extension: Extension) -> Self {
        Self {
            command,
            p1,
            p2,
            extension: Some(extension),
            reply_format: None,
        }
    }

    /// Declares that the response carries an extension of the given format.
    #[must_use]
    pub fn expecting_reply(mut self, kind: ElementKind) -> Self {
        self.reply_format = Some(kind);
        self
    }
}

/// A decoded daemon response.
///
/// A negative status is a failure; its meaning depends on the command that
/// produced it. Extension elements are keyed by 1-based wire position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: i32,
    extension: Option<BTreeMap<u32, u32>>,
}

impl Response {
    /// Creates a response without an extension payload.
    pub fn new(status: i32) -> Self {
        Self {
            status,
            extension: None,
        }
    }

    /// Creates a response with a decoded extension payload.
    pub fn with_extension(status: i32, extension: BTreeMap<u32, u32>) -> Self {
        Self {
            status,
            extension: Some(extension),
        }
    }

    /// The raw status field.
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Whether the exchange succeeded (`status >= 0`).
    pub fn is_successful(&self) -> bool {
        self.status >= 0
    }

    /// The decoded extension, keyed by 1-based position.
    pub fn extension(&self) -> Option<&BTreeMap<u32, u32>> {
        self.extension.as_ref()
    }

    /// Extension elements in wire order.
    pub fn extension_values(&self) -> Vec<u32> {
        self.extension
            .as_ref()
            .map(|map| map.values().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_rejects_zero_elements() {
        let result = Extension::new(ElementKind::U32, vec![]);
        assert!(matches!(result, Err(ProtocolError::EmptyExtension)));
    }

    #[test]
    fn extension_rejects_oversized_element() {
        let result = Extension::new(ElementKind::U8, vec![32, 300]);
        assert!(matches!(
            result,
            Err(ProtocolError::ElementOutOfRange { value: 300, width: 1 })
        ));
    }

    #[test]
    fn extension_byte_len_scales_with_width() {
        let ext = Extension::new(ElementKind::U16, vec![1, 2, 3]).unwrap();
        assert_eq!(ext.byte_len(), 6);

        let ext = Extension::bytes(&[32, 64]).unwrap();
        assert_eq!(ext.byte_len(), 2);
        assert_eq!(ext.values(), &[32, 64]);
    }

    #[test]
    fn request_equality_covers_all_fields() {
        let a = Request::simple(Command::Servo, 14, 1500);
        let b = Request::simple(Command::Servo, 14, 1500);
        assert_eq!(a, b);

        let c = Request::simple(Command::Servo, 14, 1500).expecting_reply(ElementKind::U8);
        assert_ne!(a, c);

        let ext = Extension::new(ElementKind::U32, vec![0]).unwrap();
        let d = Request::with_extension(Command::Spio, 1, 32000, ext.clone());
        let e = Request::with_extension(Command::Spio, 1, 32000, ext);
        assert_eq!(d, e);
    }

    #[test]
    fn response_status_signs() {
        assert!(Response::new(0).is_successful());
        assert!(Response::new(41).is_successful());
        assert!(!Response::new(-2).is_successful());
    }

    #[test]
    fn extension_values_follow_position_order() {
        let map = BTreeMap::from([(2, 18), (1, 16), (3, 19)]);
        let response = Response::with_extension(3, map);
        assert_eq!(response.extension_values(), vec![16, 18, 19]);
    }
}
