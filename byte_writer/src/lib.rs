//! Little-endian byte sink shared by the format writers.

pub struct ByteWriter {
    pub data: Vec<u8>,
    offset: usize,
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteWriter {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            offset: 0,
        }
    }

    fn offset(&mut self, offset: usize) {
        self.offset += offset;
    }

    pub fn get_offset(&self) -> usize {
        self.offset
    }

    pub fn append_u8(&mut self, i: u8) {
        self.data.push(i);
        self.offset(1);
    }

    pub fn append_i8(&mut self, i: i8) {
        self.data.extend(i.to_le_bytes());
        self.offset(1);
    }

    pub fn append_u16(&mut self, i: u16) {
        self.data.extend(i.to_le_bytes());
        self.offset(2);
    }

    pub fn append_i16(&mut self, i: i16) {
        self.data.extend(i.to_le_bytes());
        self.offset(2);
    }

    pub fn append_u32(&mut self, i: u32) {
        self.data.extend(i.to_le_bytes());
        self.offset(4);
    }

    pub fn append_i32(&mut self, i: i32) {
        self.data.extend(i.to_le_bytes());
        self.offset(4);
    }

    pub fn append_u8_slice(&mut self, i: &[u8]) {
        self.data.extend_from_slice(i);
        self.offset(i.len());
    }

    /// Appends `count` zero bytes.
    pub fn append_zeroes(&mut self, count: usize) {
        self.data.resize(self.data.len() + count, 0);
        self.offset(count);
    }

    /// u16 length prefix followed by ISO-8859-1 bytes.
    ///
    /// Characters outside of Latin-1 become `?`. Strings longer than `u16::MAX` are cut.
    pub fn append_latin1_string(&mut self, s: &str) {
        let bytes = encode_latin1(s);
        let length = bytes.len().min(u16::MAX as usize);

        self.append_u16(length as u16);
        self.append_u8_slice(&bytes[..length]);
    }

    pub fn replace(&mut self, start: usize, length: usize, slice: &[u8]) {
        self.data[start..(length + start)].copy_from_slice(&slice[..length]);
    }

    pub fn replace_with_u32(&mut self, start: usize, val: u32) {
        let bytes = val.to_le_bytes();
        self.replace(start, 4, &bytes);
    }
}

/// Maps every char to its Latin-1 byte, `?` when there is none.
pub fn encode_latin1(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Every byte is a valid Latin-1 code point so this never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn little_endian_layout() {
        let mut writer = ByteWriter::new();

        writer.append_u16(0x0102);
        writer.append_i16(-2);
        writer.append_u32(0xAABBCCDD);
        writer.append_i8(-1);

        assert_eq!(
            writer.data,
            vec![0x02, 0x01, 0xFE, 0xFF, 0xDD, 0xCC, 0xBB, 0xAA, 0xFF]
        );
        assert_eq!(writer.get_offset(), 9);
    }

    #[test]
    fn replace_placeholder() {
        let mut writer = ByteWriter::new();

        writer.append_u8(7);
        let placeholder = writer.get_offset();
        writer.append_u32(0);
        writer.append_zeroes(3);

        writer.replace_with_u32(placeholder, writer.get_offset() as u32);

        assert_eq!(writer.data, vec![7, 8, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn latin1_string() {
        let mut writer = ByteWriter::new();

        writer.append_latin1_string("Café 木");

        assert_eq!(writer.data, vec![6, 0, b'C', b'a', b'f', 0xE9, b' ', b'?']);
        assert_eq!(decode_latin1(&writer.data[2..]), "Café ?");
    }
}
