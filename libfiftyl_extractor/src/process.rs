use std::sync::mpsc::Sender;

use super::channel_map::ChannelMap;
use super::config::Config;
use super::error::ProcessorError;
use super::hardware_id::RecordId;
use super::hdf_writer::HDFWriter;
use super::session::Session;
use super::worker_status::WorkerStatus;

/// The main loop of fiftyl_extractor.
///
/// This takes in a config (and progress monitor), extracts the selected channels of every
/// record in the configured window, and writes them to the output HDF5 file.
pub fn process(config: Config, tx: Sender<WorkerStatus>) -> Result<(), ProcessorError> {
    let channel_map = ChannelMap::new(config.channel_map_path.as_deref())?;
    let mut session = Session::open_with_map(&config.capture_path, channel_map)?;
    let run_number = session.get_run_id();

    // Resolve once up front so a bad selector fails before any output is made
    let selector = config.get_selector();
    let mask = selector.resolve()?;
    log::info!("Selector {} resolved to {} channels", selector, mask.len());

    let records: Vec<RecordId> = session
        .get_records()
        .iter()
        .filter(|record| config.is_record_selected(record))
        .copied()
        .collect();
    if records.is_empty() {
        log::warn!("No records of {session} fall inside the configured window");
    }

    let hdf_path = config.get_hdf_file_name(session.get_run_info())?;
    let mut writer = HDFWriter::new(&hdf_path, session.get_run_info(), session.get_filename())?;

    log::info!(
        "Extracting {} of {} records from run {} sub run {}...",
        records.len(),
        session.get_records().len(),
        run_number,
        session.get_sub_run_id()
    );
    tx.send(WorkerStatus::new(0.0, run_number, 0))?;
    for (idx, record) in records.iter().enumerate() {
        let adcs = session.extract(record, &selector)?;
        writer.write_waveforms(record, &mask, &adcs)?;
        tx.send(WorkerStatus::new(
            (idx + 1) as f32 / records.len() as f32,
            run_number,
            idx + 1,
        ))?;
    }
    writer.close()?;
    tx.send(WorkerStatus::new(1.0, run_number, records.len()))?;
    log::info!("Done with run {}.", run_number);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Fragment;
    use crate::hardware_id::GeoId;
    use crate::hdf_reader::write_capture;
    use crate::wibeth::pack_frames;
    use ndarray::Array2;
    use std::sync::mpsc::channel;

    #[test]
    fn test_process_capture() {
        let dir = std::env::temp_dir().join(format!("fiftyl_process_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let capture_path =
            dir.join("np02_run000042_0001_dataflow0_datawriter_0_20240101T120000.hdf5");

        let fragments: Vec<Fragment> = (0..2)
            .map(|link| {
                let adcs = Array2::from_shape_fn((64, 64), |(s, c)| (link * 64 + c + s) as u16);
                Fragment::new(GeoId::from_link(link), pack_frames(&adcs))
            })
            .collect();
        let records: Vec<(RecordId, Vec<Fragment>)> = (1..=3)
            .map(|n| (RecordId::new(n, 0), fragments.clone()))
            .collect();
        write_capture(&capture_path, &records).unwrap();

        let config = Config {
            capture_path: capture_path.clone(),
            hdf_path: dir.clone(),
            selector: String::from("collection"),
            first_record: Some(2),
            ..Default::default()
        };
        let (tx, rx) = channel();
        if let Err(e) = process(config, tx) {
            panic!("{e}");
        }
        let statuses: Vec<WorkerStatus> = rx.iter().collect();
        assert_eq!(statuses.last().map(|s| s.records_done), Some(2));
        assert!(statuses.iter().all(|s| s.run_number == 42));

        let output = hdf5::File::open(dir.join("run_000042_0001_waveforms.h5")).unwrap();
        let group = output.group("waveforms").unwrap();
        assert_eq!(group.member_names().unwrap().len(), 2);
        let dset = group.dataset("TriggerRecord00002.0000").unwrap();
        assert_eq!(dset.shape(), vec![64, 48]);

        drop(output);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
