//! # fiftyl_extractor
//!
//! fiftyl_extractor pulls detector waveforms out of 50L TPC capture files, written in Rust. The
//! capture files are HDF5 files produced by the DAQ, where every trigger record is stored as a set
//! of raw fragments, one per readout link. The extractor unpacks the fragments, reorders the link
//! channels into the logical channel order of the detector, and hands back the channels you asked
//! for as a (samples, channels) matrix.
//!
//! ## Installation
//!
//! Currently the only method of install is from source.
//!
//! ### HDF5
//!
//! Before building and running fiftyl_extractor, HDF5 must be installed. Typically this will
//! be installed using a package manager (homebrew, apt, etc), and the Rust libraries will
//! auto detect the location of the HDF install. If HDF5 lives somewhere custom, write the
//! following snippet into the file `.cargo/config.toml` of the repository:
//!
//! ```toml
//! [env]
//! HDF5_DIR="/path/to/my/hdf5/install/"
//!
//! [build]
//! rustflags="-C link-args=-Wl,-rpath,/path/to/my/hdf5/install/lib"
//! ```
//!
//! ### Building & Install
//!
//! To build and install the CLI use `cargo install --path ./fiftyl_extractor_cli` from the top
//! level repository.
//!
//! ## Use
//!
//! ```no_run
//! use libfiftyl_extractor::selector::Selector;
//! use libfiftyl_extractor::session::Session;
//! use std::path::Path;
//!
//! let mut session = Session::open(Path::new(
//!     "~/data/np02_run029000_0003_dataflow0_datawriter_0_20230918T134210.hdf5",
//! ))
//! .unwrap();
//! let record = session.get_records()[0];
//! let everything = session.extract(&record, &Selector::Absent).unwrap();
//! let collection = session.extract(&record, &Selector::from("collection")).unwrap();
//! let planes: Selector = ["collection", "i2"].into_iter().collect();
//! let both = session.extract(&record, &planes).unwrap();
//! ```
//!
//! ## Selecting channels
//!
//! - Nothing ([selector::Selector::Absent]): all 128 channels in logical order
//! - An index: one channel. Negative indices count back from the last channel.
//! - A plane name: `collection` (`collect`, `c`) is channels 0-47, `induction1`
//!   (`induction 1`, `i1`, `1`) is channels 48-87, `induction2` (`induction 2`, `i2`, `2`) is
//!   channels 88-127. Names are case-insensitive.
//! - A collection: up to three plane names are concatenated in the order given. Anything
//!   else is taken as a list of channel indices, duplicates included.
//!
//! ## Configuration
//!
//! The CLI reads a YAML configuration:
//!
//! ```yml
//! capture_path: /path/to/np02_run029000_0003_dataflow0_datawriter_0_20230918T134210.hdf5
//! hdf_path: /path/to/output/
//! channel_map_path: null
//! selector: collection, i2
//! first_record: null
//! last_record: null
//! ```
//!
//! Note that if the `channel_map_path` field is set to `null`, the bundled 50L map will be used.
//!
//! ### Channel Map Format
//!
//! The channel map is a CSV file with a header row. The columns are as follows:
//!
//! ```csv
//! logical,link,link channel
//! ```
//!
//! Every logical channel 0-127 must appear exactly once, and no (link, link channel) pair may be
//! used twice.
//!
//! ## Output
//!
//! ```text
//! run_029000_0003_waveforms.h5 - run_id, sub_run_id, runtime, source, version
//! waveforms - n_records
//! |---- TriggerRecord#####.####(dset) - record, sequence, channels
//! ```
pub mod assembler;
pub mod capture;
pub mod channel_map;
pub mod config;
pub mod constants;
pub mod error;
pub mod hardware_id;
pub mod hdf_reader;
pub mod hdf_writer;
pub mod plane;
pub mod process;
pub mod run_info;
pub mod selector;
pub mod session;
pub mod wibeth;
pub mod worker_status;
