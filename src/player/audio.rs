//! Audio playback engine for the clip pad.
//!
//! One clip plays at a time through a single rodio sink. Clips are decoded
//! whole (WAV via hound, FLAC via claxon) so the engine can start playback
//! at any point inside the file; rodio has no native seeking, so seeks
//! rebuild the sink with a source skipped to the target frame. A shared
//! atomic counter tracks how many samples the sink has consumed, which is
//! what position readouts and window checks are computed from.

use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

pub struct AudioInfo {
    pub channels: u16,
    pub sample_rate: u32,
}

pub struct AudioEngine {
    stream: OutputStream,
    sink: Sink,
    pub info: Option<AudioInfo>,
    pub duration: Option<Duration>,
    samples_played: Arc<AtomicUsize>,
    total_samples: usize,
    current_path: Option<PathBuf>,
}

impl AudioEngine {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let stream = OutputStreamBuilder::open_default_stream()?;
        let sink = Sink::connect_new(stream.mixer());

        Ok(Self {
            stream,
            sink,
            info: None,
            duration: None,
            samples_played: Arc::new(AtomicUsize::new(0)),
            total_samples: 0,
            current_path: None,
        })
    }

    /// Decode a clip and start playback at `start_ms` into the file.
    pub fn load_clip(&mut self, path: &Path, start_ms: i64) -> Result<(), Box<dyn Error>> {
        self.sink.stop();
        self.sink = Sink::connect_new(self.stream.mixer());
        self.current_path = Some(path.to_path_buf());

        let mut source = ClipSource::open(path, self.samples_played.clone())?;
        self.info = Some(AudioInfo {
            channels: source.channels,
            sample_rate: source.sample_rate,
        });
        self.duration = source.total_duration();
        self.total_samples = source.len();

        let start = self.sample_index_for_ms(start_ms);
        source.skip_to(start);
        self.samples_played.store(start, Ordering::Relaxed);

        log::info!(
            "Loaded {}: {} samples, starting at {start_ms}ms",
            path.display(),
            self.total_samples
        );

        self.sink.append(source);
        Ok(())
    }

    pub fn play(&self) {
        self.sink.play();
    }

    pub fn pause(&self) {
        self.sink.pause();
    }

    pub fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    /// True once the sink has drained the current source.
    pub fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    pub fn stop(&mut self) {
        self.sink.stop();
        self.sink = Sink::connect_new(self.stream.mixer());
        self.samples_played.store(0, Ordering::Relaxed);
    }

    /// Playback position in milliseconds, derived from the sample counter.
    pub fn position_ms(&self) -> i64 {
        let Some(info) = &self.info else {
            return 0;
        };
        let per_second = info.sample_rate as f64 * info.channels as f64;
        if per_second <= 0.0 {
            return 0;
        }
        let played = self.samples_played.load(Ordering::Relaxed) as f64;
        (played / per_second * 1000.0).round() as i64
    }

    pub fn duration_ms(&self) -> Option<i64> {
        self.duration.map(|d| d.as_millis() as i64)
    }

    /// Jump to an absolute position by rebuilding the sink at that frame.
    /// Pause state survives the seek.
    pub fn seek_to_ms(&mut self, ms: i64) -> Result<(), Box<dyn Error>> {
        let Some(path) = self.current_path.clone() else {
            return Ok(());
        };
        let target = self.sample_index_for_ms(ms);
        let was_playing = !self.sink.is_paused();

        self.sink.stop();
        self.sink = Sink::connect_new(self.stream.mixer());

        let mut source = ClipSource::open(&path, self.samples_played.clone())?;
        source.skip_to(target);
        self.samples_played.store(target, Ordering::Relaxed);
        self.sink.append(source);

        if was_playing {
            self.sink.play();
        } else {
            self.sink.pause();
        }

        log::info!("Seek to {ms}ms");
        Ok(())
    }

    /// Interleaved sample index for a time, aligned to a frame boundary so
    /// seeking never swaps channels.
    fn sample_index_for_ms(&self, ms: i64) -> usize {
        let Some(info) = &self.info else {
            return 0;
        };
        let frames = (ms.max(0) as f64 / 1000.0 * info.sample_rate as f64) as usize;
        (frames * info.channels as usize).min(self.total_samples)
    }
}

/// A fully decoded clip that reports consumption through a shared counter.
struct ClipSource {
    samples: Vec<i32>,
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
    position: usize,
    samples_played: Arc<AtomicUsize>,
}

impl ClipSource {
    fn open(path: &Path, samples_played: Arc<AtomicUsize>) -> Result<Self, Box<dyn Error>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "wav" => Self::from_wav(hound::WavReader::open(path)?, samples_played),
            "flac" => Self::from_flac(claxon::FlacReader::open(path)?, samples_played),
            _ => Err(format!("Unsupported audio format: {ext}").into()),
        }
    }

    fn from_wav(
        mut reader: hound::WavReader<BufReader<File>>,
        samples_played: Arc<AtomicUsize>,
    ) -> Result<Self, Box<dyn Error>> {
        let spec = reader.spec();
        if spec.sample_format == hound::SampleFormat::Float {
            return Err("Float WAV files are not supported".into());
        }

        // Keep samples at native depth; normalization happens on iteration
        let samples = match spec.bits_per_sample {
            8 => {
                let samples: Result<Vec<i8>, _> = reader.samples().collect();
                samples?.into_iter().map(|s| s as i32).collect()
            }
            16 => {
                let samples: Result<Vec<i16>, _> = reader.samples().collect();
                samples?.into_iter().map(|s| s as i32).collect()
            }
            24 | 32 => {
                let samples: Result<Vec<i32>, _> = reader.samples().collect();
                samples?
            }
            _ => return Err(format!("Unsupported bit depth: {}", spec.bits_per_sample).into()),
        };

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            position: 0,
            samples_played,
        })
    }

    fn from_flac<R: Read>(
        mut reader: claxon::FlacReader<R>,
        samples_played: Arc<AtomicUsize>,
    ) -> Result<Self, Box<dyn Error>> {
        let info = reader.streaminfo();

        let mut samples = Vec::new();
        for sample in reader.samples() {
            samples.push(sample?);
        }

        Ok(Self {
            samples,
            sample_rate: info.sample_rate,
            channels: info.channels as u16,
            bits_per_sample: info.bits_per_sample as u16,
            position: 0,
            samples_played,
        })
    }

    fn skip_to(&mut self, sample_position: usize) {
        self.position = sample_position.min(self.samples.len());
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

impl Iterator for ClipSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.samples.len() {
            return None;
        }

        let sample = self.samples[self.position];
        self.position += 1;
        self.samples_played.fetch_add(1, Ordering::Relaxed);

        let full_scale = (1i64 << (self.bits_per_sample - 1)) as f32;
        Some(sample as f32 / full_scale)
    }
}

impl Source for ClipSource {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let per_second = self.sample_rate as f64 * self.channels as f64;
        if per_second <= 0.0 {
            return None;
        }
        Some(Duration::from_secs_f64(self.samples.len() as f64 / per_second))
    }
}
