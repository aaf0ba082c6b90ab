//! Lightweight header probing for WAV and FLAC files. Reads just enough of
//! each container to report the sample format and total duration without
//! decoding any audio.

use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct AudioMetadata {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub duration_seconds: Option<f64>,
}

impl AudioMetadata {
    pub fn duration_ms(&self) -> Option<i64> {
        self.duration_seconds.map(|s| (s * 1000.0).round() as i64)
    }
}

/// Probe an audio file by extension. Only `.wav` and `.flac` are recognized.
pub fn probe_audio_metadata(path: &Path) -> Result<AudioMetadata, Box<dyn Error>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("wav") => probe_wav(path),
        Some("flac") => probe_flac(path),
        _ => Err(format!("Unsupported audio format: {}", path.display()).into()),
    }
}

fn probe_flac(path: &Path) -> Result<AudioMetadata, Box<dyn Error>> {
    let mut file = BufReader::new(File::open(path)?);
    let mut magic = [0u8; 4];
    file.read_exact(&mut magic)?;
    if &magic != b"fLaC" {
        return Err("Not a valid FLAC file".into());
    }

    // Walk the metadata blocks looking for STREAMINFO (type 0).
    let mut header = [0u8; 4];
    loop {
        file.read_exact(&mut header)?;
        let is_last = header[0] & 0x80 != 0;
        let block_type = header[0] & 0x7F;
        let block_size = u32::from_be_bytes([0, header[1], header[2], header[3]]);

        if block_type == 0 {
            if block_size < 34 {
                return Err("Truncated STREAMINFO block".into());
            }
            let mut streaminfo = [0u8; 34];
            file.read_exact(&mut streaminfo)?;
            return Ok(parse_streaminfo(&streaminfo));
        }

        if is_last {
            break;
        }
        file.seek(SeekFrom::Current(block_size as i64))?;
    }

    Err("FLAC file has no STREAMINFO block".into())
}

fn parse_streaminfo(streaminfo: &[u8; 34]) -> AudioMetadata {
    // Min/max block size and min/max frame size occupy the first 10 bytes.
    // The packed fields after them: 20-bit sample rate, 3-bit channel count
    // minus one, 5-bit bits-per-sample minus one, 36-bit total samples.
    let sample_rate = u32::from_be_bytes([0, streaminfo[10], streaminfo[11], streaminfo[12]]) >> 4;
    let channels = ((streaminfo[12] & 0x0E) >> 1) + 1;
    let bits_per_sample = (((streaminfo[12] & 0x01) << 4) | ((streaminfo[13] & 0xF0) >> 4)) + 1;

    let total_samples = ((streaminfo[13] as u64 & 0x0F) << 32)
        | (streaminfo[14] as u64) << 24
        | (streaminfo[15] as u64) << 16
        | (streaminfo[16] as u64) << 8
        | (streaminfo[17] as u64);

    let duration_seconds = if sample_rate > 0 && total_samples > 0 {
        Some(total_samples as f64 / sample_rate as f64)
    } else {
        None
    };

    AudioMetadata {
        sample_rate,
        channels: channels as u16,
        bits_per_sample: bits_per_sample as u16,
        duration_seconds,
    }
}

fn probe_wav(path: &Path) -> Result<AudioMetadata, Box<dyn Error>> {
    let mut file = BufReader::new(File::open(path)?);
    let mut tag = [0u8; 4];
    file.read_exact(&mut tag)?;
    if &tag != b"RIFF" {
        return Err("Not a valid WAV file".into());
    }
    file.seek(SeekFrom::Current(4))?;
    file.read_exact(&mut tag)?;
    if &tag != b"WAVE" {
        return Err("Not a valid WAV file".into());
    }

    // channels, sample rate, byte rate, bits per sample
    let mut format: Option<(u16, u32, u32, u16)> = None;
    let mut data_len: Option<u32> = None;

    let mut chunk_id = [0u8; 4];
    let mut size_bytes = [0u8; 4];
    loop {
        if file.read_exact(&mut chunk_id).is_err() {
            break;
        }
        file.read_exact(&mut size_bytes)?;
        let chunk_size = u32::from_le_bytes(size_bytes);

        let mut consumed = 0u32;
        match &chunk_id {
            b"fmt " => {
                if chunk_size < 16 {
                    return Err("Malformed fmt chunk".into());
                }
                let mut fmt = [0u8; 16];
                file.read_exact(&mut fmt)?;
                consumed = 16;

                let channels = u16::from_le_bytes([fmt[2], fmt[3]]);
                let sample_rate = u32::from_le_bytes([fmt[4], fmt[5], fmt[6], fmt[7]]);
                let byte_rate = u32::from_le_bytes([fmt[8], fmt[9], fmt[10], fmt[11]]);
                let bits_per_sample = u16::from_le_bytes([fmt[14], fmt[15]]);
                format = Some((channels, sample_rate, byte_rate, bits_per_sample));
            }
            b"data" => {
                data_len = Some(chunk_size);
            }
            _ => {}
        }

        if format.is_some() && data_len.is_some() {
            break;
        }

        // Chunks are word aligned, so odd sizes carry a pad byte.
        let skip = (chunk_size - consumed) as i64 + (chunk_size % 2) as i64;
        file.seek(SeekFrom::Current(skip))?;
    }

    let (channels, sample_rate, byte_rate, bits_per_sample) =
        format.ok_or("WAV file has no fmt chunk")?;

    let duration_seconds = data_len.and_then(|len| {
        let rate = if byte_rate > 0 {
            byte_rate
        } else {
            sample_rate * channels as u32 * (bits_per_sample / 8) as u32
        };
        if rate > 0 {
            Some(len as f64 / rate as f64)
        } else {
            None
        }
    });

    Ok(AudioMetadata {
        sample_rate,
        channels,
        bits_per_sample,
        duration_seconds,
    })
}
