use super::messages::*;
use bytes::{BufMut, BytesMut};
use std::io;
use tokio_util::codec::Encoder;
use tracing::trace;

/// Encodes extended-protocol frontend messages
#[derive(Debug, Clone, Default)]
pub struct FrontendCodec;

impl FrontendCodec {
    pub fn new() -> Self {
        FrontendCodec
    }
}

impl Encoder<FrontendMessage> for FrontendCodec {
    type Error = io::Error;

    fn encode(&mut self, msg: FrontendMessage, dst: &mut BytesMut) -> Result<(), Self::Error> {
        trace!("Encoding message: {:?}", msg);
        match msg {
            FrontendMessage::Parse { name, query, param_types } => encode_parse(&name, &query, &param_types, dst),
            FrontendMessage::Bind {
                portal,
                statement,
                formats,
                values,
                result_formats,
            } => encode_bind(&portal, &statement, &formats, &values, &result_formats, dst),
            FrontendMessage::Execute { portal, max_rows } => {
                encode_execute(&portal, max_rows, dst);
                Ok(())
            }
            FrontendMessage::Sync => {
                dst.put_u8(b'S');
                dst.put_i32(4);
                Ok(())
            }
        }
    }
}

fn encode_parse(name: &str, query: &str, param_types: &[u32], dst: &mut BytesMut) -> io::Result<()> {
    dst.put_u8(b'P');
    let len_pos = dst.len();
    dst.put_i32(0); // Placeholder

    put_cstring(dst, name)?;
    put_cstring(dst, query)?;
    dst.put_i16(count(param_types.len())?);
    for oid in param_types {
        dst.put_u32(*oid);
    }

    update_message_length(dst, len_pos);
    Ok(())
}

fn encode_bind(
    portal: &str,
    statement: &str,
    formats: &[i16],
    values: &[Option<Vec<u8>>],
    result_formats: &[i16],
    dst: &mut BytesMut,
) -> io::Result<()> {
    dst.put_u8(b'B');
    let len_pos = dst.len();
    dst.put_i32(0); // Placeholder

    put_cstring(dst, portal)?;
    put_cstring(dst, statement)?;

    dst.put_i16(count(formats.len())?);
    for format in formats {
        dst.put_i16(*format);
    }

    dst.put_i16(count(values.len())?);
    for value in values {
        match value {
            Some(bytes) => {
                let len = i32::try_from(bytes.len())
                    .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "parameter value too large"))?;
                dst.put_i32(len);
                dst.put_slice(bytes);
            }
            None => dst.put_i32(-1),
        }
    }

    dst.put_i16(count(result_formats.len())?);
    for format in result_formats {
        dst.put_i16(*format);
    }

    update_message_length(dst, len_pos);
    Ok(())
}

fn encode_execute(portal: &str, max_rows: i32, dst: &mut BytesMut) {
    dst.put_u8(b'E');
    let len_pos = dst.len();
    dst.put_i32(0); // Placeholder

    dst.put_slice(portal.as_bytes());
    dst.put_u8(0);
    dst.put_i32(max_rows);

    update_message_length(dst, len_pos);
}

fn count(n: usize) -> io::Result<i16> {
    i16::try_from(n).map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many parameters"))
}

fn put_cstring(dst: &mut BytesMut, s: &str) -> io::Result<()> {
    if s.as_bytes().contains(&0) {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "string contains a NUL byte"));
    }
    dst.put_slice(s.as_bytes());
    dst.put_u8(0);
    Ok(())
}

fn update_message_length(dst: &mut BytesMut, len_pos: usize) {
    let len = (dst.len() - len_pos) as i32;
    dst[len_pos..len_pos + 4].copy_from_slice(&len.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::EncodedValue;
    use crate::types::NativeTypeName;

    fn params() -> Vec<EncodedValue> {
        let type_name = NativeTypeName::parse("public.post_status_info").unwrap();
        vec![
            EncodedValue::new(type_name.clone(), Some(16_385), Some("APPROVED")),
            EncodedValue::new(type_name, Some(16_385), None),
        ]
    }

    #[test]
    fn test_parse_declares_enum_oid() {
        let mut buf = BytesMut::new();
        let msg = FrontendMessage::parse("s1", "SELECT 1", &params());
        FrontendCodec::new().encode(msg, &mut buf).unwrap();

        let mut expected = vec![b'P'];
        expected.extend_from_slice(&26i32.to_be_bytes());
        expected.extend_from_slice(b"s1\0SELECT 1\0");
        expected.extend_from_slice(&2i16.to_be_bytes());
        expected.extend_from_slice(&16_385u32.to_be_bytes());
        expected.extend_from_slice(&16_385u32.to_be_bytes());
        assert_eq!(&buf[..], &expected[..]);
    }

    #[test]
    fn test_bind_carries_label_and_typed_null() {
        let mut buf = BytesMut::new();
        let msg = FrontendMessage::bind("", "s1", &params());
        FrontendCodec::new().encode(msg, &mut buf).unwrap();

        let mut expected = vec![b'B'];
        expected.extend_from_slice(&34i32.to_be_bytes());
        expected.extend_from_slice(b"\0s1\0");
        expected.extend_from_slice(&1i16.to_be_bytes());
        expected.extend_from_slice(&FORMAT_TEXT.to_be_bytes());
        expected.extend_from_slice(&2i16.to_be_bytes());
        expected.extend_from_slice(&8i32.to_be_bytes());
        expected.extend_from_slice(b"APPROVED");
        expected.extend_from_slice(&(-1i32).to_be_bytes());
        expected.extend_from_slice(&1i16.to_be_bytes());
        expected.extend_from_slice(&FORMAT_TEXT.to_be_bytes());
        assert_eq!(&buf[..], &expected[..]);
    }

    #[test]
    fn test_unknown_oid_left_to_server() {
        let type_name = NativeTypeName::parse("post_status_info").unwrap();
        let msg = FrontendMessage::parse("", "q", &[EncodedValue::new(type_name, None, Some("SPAM"))]);
        match msg {
            FrontendMessage::Parse { param_types, .. } => assert_eq!(param_types, vec![0]),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_sync_and_execute() {
        let mut buf = BytesMut::new();
        let mut codec = FrontendCodec::new();
        codec.encode(FrontendMessage::Execute { portal: String::new(), max_rows: 0 }, &mut buf).unwrap();
        codec.encode(FrontendMessage::Sync, &mut buf).unwrap();
        assert_eq!(&buf[..], b"E\0\0\0\x09\0\0\0\0\0S\0\0\0\x04");
    }

    #[test]
    fn test_nul_in_query_rejected() {
        let mut buf = BytesMut::new();
        let msg = FrontendMessage::Parse { name: String::new(), query: "a\0b".to_string(), param_types: vec![] };
        assert!(FrontendCodec::new().encode(msg, &mut buf).is_err());
    }
}
