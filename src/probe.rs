use std::io::Cursor;

use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;

use crate::ports::{DurationProbe, UploadFile};
use crate::services::naming::audio_format_from_url;

/// Reads the duration from the container headers without decoding audio.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataDurationProbe;

impl DurationProbe for MetadataDurationProbe {
    fn probe(&self, file: &UploadFile) -> Option<f64> {
        let seconds = probe_seconds(file);
        if seconds.is_none() {
            tracing::debug!(name = %file.name, "could not read duration from metadata");
        }
        seconds
    }
}

fn probe_seconds(file: &UploadFile) -> Option<f64> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(file.bytes.clone())), Default::default());

    let mut hint = Hint::new();
    if let Some(format) = audio_format_from_url(&file.name) {
        hint.with_extension(&format);
    }
    if let Some(ref mime) = file.content_type {
        hint.mime_type(mime);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .ok()?;

    let track = probed.format.default_track()?;
    let params = &track.codec_params;
    let frames = params.n_frames?;
    let time_base = params
        .time_base
        .or_else(|| params.sample_rate.map(|rate| TimeBase::new(1, rate)))?;

    let time = time_base.calc_time(frames);
    let seconds = time.seconds as f64 + time.frac;
    (seconds.is_finite() && seconds > 0.0).then_some(seconds)
}
