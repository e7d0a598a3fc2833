use std::path::Path;
use time::PrimitiveDateTime;

use super::constants::DATETIME_FORMAT;
use super::error::RunInfoError;

const RUN_PREFIX_LEN: usize = 3; // "run" in run029000
const MIN_SEGMENTS: usize = 4; // prefix, run, sub run, ..., timestamp

/// Run identifiers encoded in a capture filename.
///
/// Capture files are named `<prefix>_run<run>_<sub run>_..._<YYYYMMDDTHHMMSS>.<ext>`, with each
/// field separated by an underscore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInfo {
    pub run_id: u32,
    pub sub_run_id: u32,
    pub datetime: PrimitiveDateTime,
}

impl RunInfo {
    /// Parse the run info from the file name of a path. Directories are ignored.
    pub fn from_path(path: &Path) -> Result<Self, RunInfoError> {
        let bad_pattern = || RunInfoError::BadPattern(path.to_path_buf());
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(bad_pattern)?;

        let segments: Vec<&str> = name.split('_').collect();
        if segments.len() < MIN_SEGMENTS {
            return Err(bad_pattern());
        }

        let run_id = segments[1]
            .get(RUN_PREFIX_LEN..)
            .ok_or_else(bad_pattern)?
            .parse()?;
        let sub_run_id = segments[2].parse()?;
        let stamp = segments[segments.len() - 1]
            .split('.')
            .next()
            .ok_or_else(bad_pattern)?;
        let datetime = PrimitiveDateTime::parse(stamp, DATETIME_FORMAT)?;

        Ok(Self {
            run_id,
            sub_run_id,
            datetime,
        })
    }

    /// The run timestamp in the same format as the filename
    pub fn runtime(&self) -> Result<String, RunInfoError> {
        Ok(self.datetime.format(DATETIME_FORMAT)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_parse_filename() {
        let path =
            Path::new("/data/np02_run029000_0003_dataflow0_datawriter_0_20230918T134210.hdf5");
        let info = match RunInfo::from_path(path) {
            Ok(i) => i,
            Err(e) => panic!("{e}"),
        };
        assert_eq!(info.run_id, 29000);
        assert_eq!(info.sub_run_id, 3);
        assert_eq!(info.datetime, datetime!(2023-09-18 13:42:10));
        assert_eq!(info.runtime().unwrap(), "20230918T134210");
    }

    #[test]
    fn test_underscores_in_directory_are_ignored() {
        let path = Path::new("/my_data/run_12/np02_run000012_0000_x_20240101T000000.h5");
        let info = RunInfo::from_path(path).unwrap();
        assert_eq!(info.run_id, 12);
        assert_eq!(info.sub_run_id, 0);
    }

    #[test]
    fn test_bad_filenames() {
        assert!(matches!(
            RunInfo::from_path(Path::new("capture.hdf5")),
            Err(RunInfoError::BadPattern(_))
        ));
        assert!(matches!(
            RunInfo::from_path(Path::new("np02_runABC_0000_x_20240101T000000.h5")),
            Err(RunInfoError::ParsingError(_))
        ));
        assert!(matches!(
            RunInfo::from_path(Path::new("np02_ru_0000_x_20240101T000000.h5")),
            Err(RunInfoError::BadPattern(_))
        ));
        assert!(matches!(
            RunInfo::from_path(Path::new("np02_run000012_0000_x_2024-01-01.h5")),
            Err(RunInfoError::TimeError(_))
        ));
    }
}
