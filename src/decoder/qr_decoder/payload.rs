use log::trace;

use crate::decoder::bitstream::BitReader;
use crate::decoder::modes::Payload;
use crate::decoder::modes::{
    alphanumeric::AlphanumericDecoder, byte::ByteDecoder, eci::EciDecoder, kanji::KanjiDecoder,
    numeric::NumericDecoder,
};
use crate::decoder::reed_solomon::ReedSolomonDecoder;
use crate::decoder::tables::{
    MODE_ALPHA, MODE_BYTE, MODE_ECI, MODE_KANJI, MODE_NUMERIC, char_count_bits, ec_block_info,
};
use crate::error::DecodeError;
use crate::models::{DataType, ECLevel};

/// Longest RS block of any version
const MAX_BLOCK_LEN: usize = 153;

/// Split interleaved codewords into RS blocks, correct each, and return the
/// data codewords in block order.
///
/// Short blocks come first; long blocks carry one extra data codeword.
pub(super) fn deinterleave_and_correct(
    codewords: &[u8],
    version: u8,
    ec_level: ECLevel,
) -> Result<Vec<u8>, DecodeError> {
    let info = ec_block_info(version, ec_level).ok_or(DecodeError::InvalidVersion)?;
    let total = codewords.len();
    let num_blocks = info.num_blocks;
    let ecc_total = num_blocks * info.ecc_per_block;
    if total <= ecc_total {
        return Err(DecodeError::DataEcc);
    }
    let data_total = total - ecc_total;

    let num_long_blocks = data_total % num_blocks;
    let num_short_blocks = num_blocks - num_long_blocks;
    let short_len = data_total / num_blocks;
    if short_len + 1 + info.ecc_per_block > MAX_BLOCK_LEN {
        return Err(DecodeError::DataEcc);
    }

    let rs = ReedSolomonDecoder::new(info.ecc_per_block);
    let mut data_out = Vec::new();
    data_out.try_reserve_exact(data_total)?;
    let mut block = [0u8; MAX_BLOCK_LEN];

    for b in 0..num_blocks {
        let data_len = if b < num_short_blocks { short_len } else { short_len + 1 };
        let block_len = data_len + info.ecc_per_block;

        for i in 0..short_len {
            block[i] = codewords[i * num_blocks + b];
        }
        if data_len > short_len {
            block[short_len] = codewords[short_len * num_blocks + (b - num_short_blocks)];
        }
        for j in 0..info.ecc_per_block {
            block[data_len + j] = codewords[data_total + j * num_blocks + b];
        }

        if let Err(err) = rs.decode(&mut block[..block_len]) {
            trace!("block {} of {} uncorrectable", b, num_blocks);
            return Err(err);
        }
        data_out.extend_from_slice(&block[..data_len]);
    }

    Ok(data_out)
}

/// Parse mode segments until the terminator or the end of the stream
pub(super) fn decode_payload(data_codewords: &[u8], version: u8) -> Result<Payload, DecodeError> {
    let mut reader = BitReader::new(data_codewords);
    let mut payload = Payload::new()?;

    while reader.remaining() >= 4 {
        let mode = reader.read(4)?;
        let kind = match mode {
            0 => break,
            MODE_NUMERIC => DataType::NUMERIC,
            MODE_ALPHA => DataType::ALPHA,
            MODE_BYTE => DataType::BYTE,
            MODE_KANJI => DataType::KANJI,
            MODE_ECI => {
                payload.eci = EciDecoder::decode(&mut reader)?;
                continue;
            }
            _ => {
                trace!("unknown mode indicator {:#x}", mode);
                return Err(DecodeError::UnknownDataType);
            }
        };

        let count = reader.read(char_count_bits(mode, version))? as usize;
        match mode {
            MODE_NUMERIC => NumericDecoder::decode(&mut reader, count, &mut payload)?,
            MODE_ALPHA => AlphanumericDecoder::decode(&mut reader, count, &mut payload)?,
            MODE_BYTE => ByteDecoder::decode(&mut reader, count, &mut payload)?,
            _ => KanjiDecoder::decode(&mut reader, count, &mut payload)?,
        }
        payload.data_type |= kind;
    }

    Ok(payload)
}
