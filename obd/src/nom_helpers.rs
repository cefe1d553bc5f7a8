use nom::{
    bytes::complete::take, combinator::map, number::complete::le_u16, IResult as _IResult, Parser,
};

use crate::error::{DecodeStage, ObdError};

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

/// u16 length prefix then that many Latin-1 bytes.
pub fn latin1_string(i: &[u8]) -> IResult<'_, String> {
    let (i, length) = le_u16(i)?;

    map(take(length as usize), byte_writer::decode_latin1).parse(i)
}

/// Nom only knows it ran out of bytes, the caller knows which stage that was.
pub fn at_stage<T>(res: IResult<'_, T>, stage: DecodeStage) -> Result<(&[u8], T), ObdError> {
    res.map_err(|_| ObdError::Truncated { stage })
}
