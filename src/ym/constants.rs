/// Number of sound-chip registers logged per frame
pub const NUM_REGISTERS: usize = 14;

/// "YM3!" magic
pub const YM3_MAGIC: u32 = 0x594d_3321;

/// "YM5!" magic
pub const YM5_MAGIC: u32 = 0x594d_3521;

/// "YM6!" magic
pub const YM6_MAGIC: u32 = 0x594d_3621;

/// Check string following the YM5/YM6 magic
pub const YM56_CHECK: [u8; 8] = *b"LeOnArD!";

/// Size of the fixed YM5/YM6 header
pub const YM56_HEADER_SIZE: usize = 34;

/// Attribute bit set when register data is stored register by register
pub const ATTR_INTERLEAVED: u32 = 1 << 0;

/// Display names for the 14 registers
pub const REGISTER_NAMES: [&str; NUM_REGISTERS] = [
    "A period lo",
    "A period hi",
    "B period lo",
    "B period hi",
    "C period lo",
    "C period hi",
    "Noise period",
    "Mixer",
    "A volume",
    "B volume",
    "C volume",
    "Env period lo",
    "Env period hi",
    "Env shape",
];

/// Mixer register: tone enable bits 0-2, noise enable bits 3-5
pub const MIXER_REGISTER: usize = 7;

/// Channel A volume register; B and C follow
pub const FIRST_VOLUME_REGISTER: usize = 8;

/// Streams packed once the mixer is folded into the volume registers
pub const NUM_STREAMS: usize = NUM_REGISTERS - 1;

/// Display names for the 13 folded streams
pub const STREAM_NAMES: [&str; NUM_STREAMS] = [
    "A period lo",
    "A period hi",
    "B period lo",
    "B period hi",
    "C period lo",
    "C period hi",
    "Noise period",
    "A volume + mixer",
    "B volume + mixer",
    "C volume + mixer",
    "Env period lo",
    "Env period hi",
    "Env shape",
];
