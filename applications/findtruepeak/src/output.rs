/// Report rendering for the command line
use serde::Serialize;
use std::path::Path;
use truepeak::TruePeakReport;

/// JSON shape of one measured file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport<'a> {
    pub file: String,
    #[serde(flatten)]
    pub report: &'a TruePeakReport,
    /// dBTP per channel, `null` for silent channels
    pub true_peaks_dbtp: Vec<Option<f64>>,
}

impl<'a> FileReport<'a> {
    pub fn new(path: &Path, report: &'a TruePeakReport) -> Self {
        let true_peaks_dbtp = report
            .peaks_db()
            .into_iter()
            .map(|db| db.is_finite().then_some(db))
            .collect();

        Self {
            file: path.display().to_string(),
            report,
            true_peaks_dbtp,
        }
    }
}

/// Text block for one file, in the `File : ... / Channel <i>\t MaxTP : ...` layout
pub fn render_text(path: &Path, report: &TruePeakReport, precision: usize) -> String {
    format!(
        "File : {}\nChannels : {}, Fs : {}, totalFrames : {}\n{:.*}\n",
        path.display(),
        report.channels,
        report.sample_rate.hz(),
        report.frames,
        precision,
        report
    )
}

pub fn render_json(path: &Path, report: &TruePeakReport) -> serde_json::Result<String> {
    serde_json::to_string(&FileReport::new(path, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use truepeak::SampleRate;

    fn report() -> TruePeakReport {
        TruePeakReport {
            sample_rate: SampleRate::Hz44100,
            channels: 2,
            frames: 441,
            peaks: vec![0.5, 0.0],
        }
    }

    #[test]
    fn test_render_text() {
        let text = render_text(Path::new("song.wav"), &report(), 2);
        assert_eq!(
            text,
            "File : song.wav\n\
             Channels : 2, Fs : 44100, totalFrames : 441\n\
             Channel 0\t MaxTP : -6.02\n\
             Channel 1\t MaxTP : -inf\n"
        );
    }

    #[test]
    fn test_render_json() {
        let json = render_json(Path::new("song.wav"), &report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["file"], "song.wav");
        assert_eq!(value["sample_rate"], 44100);
        assert_eq!(value["channels"], 2);
        assert_eq!(value["peaks"][0], 0.5);
        assert!(value["true_peaks_dbtp"][1].is_null());
        let db = value["true_peaks_dbtp"][0].as_f64().unwrap();
        assert!((db - (-6.0206)).abs() < 0.001);
    }
}
