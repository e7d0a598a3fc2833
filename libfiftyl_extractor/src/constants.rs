// Detector readout
pub const CHANNELS_PER_LINK: usize = 64;
pub const NUMBER_OF_LINKS: usize = 2;
pub const NUMBER_OF_CHANNELS: usize = CHANNELS_PER_LINK * NUMBER_OF_LINKS;

// Geographic ID
pub const GEO_ID_LINK_SHIFT: u64 = 48;
pub const GEO_ID_LINK_MASK: u64 = 0xffff;

// DAQ fragment header
pub const FRAGMENT_HEADER_SIZE: usize = 72;
pub const FRAGMENT_MAGIC: u32 = 0x11112222;
pub const FRAGMENT_SIZE_OFFSET: usize = 8;

// WIBEth frames
pub const WIBETH_DAQ_HEADER_SIZE: usize = 8;
pub const WIBETH_HEADER_SIZE: usize = 16;
pub const WIBETH_BITS_PER_ADC: usize = 14;
pub const WIBETH_SAMPLES_PER_FRAME: usize = 64;
pub const WIBETH_ADC_WORDS: usize =
    WIBETH_BITS_PER_ADC * WIBETH_SAMPLES_PER_FRAME * CHANNELS_PER_LINK / 64;
pub const WIBETH_FRAME_SIZE: usize =
    WIBETH_DAQ_HEADER_SIZE + WIBETH_HEADER_SIZE + WIBETH_ADC_WORDS * 8;

// Capture file layout
pub const RECORD_GROUP_PREFIX: &str = "TriggerRecord";
pub const RAW_DATA_GROUP: &str = "RawData";
pub const GEO_ID_ATTR: &str = "geo_id";

/// Timestamp format of the capture filename, e.g. 20230918T134210
pub const DATETIME_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year][month][day]T[hour][minute][second]");
