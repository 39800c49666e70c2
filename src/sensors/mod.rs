//! Sensor snapshots returned by the subsystem `GetData` accessors.
//!
//! The core does not sample anything itself.  Each subsystem keeps its
//! latest reading and raises a data-ready notification; the control layer
//! then fetches the snapshot through
//! [`SensorDataPort`](crate::app::ports::SensorDataPort) and hands it to the
//! log writer.  Units follow the sensor datasheets so the logger can store
//! them without conversion.

/// Kind of data-ready notification raised by a subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataReady {
    Baro,
    Hum,
    Mag,
    /// New GNSS navigation solution.
    Gnss,
    /// GNSS receiver reports a valid UTC time.
    GnssTime,
    Imu,
}

impl DataReady {
    pub const ALL: [DataReady; 6] = [
        DataReady::Baro,
        DataReady::Hum,
        DataReady::Mag,
        DataReady::Gnss,
        DataReady::GnssTime,
        DataReady::Imu,
    ];
}

/// Barometer reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BaroData {
    /// Milliseconds since boot.
    pub time_ms: u32,
    /// Pascals.
    pub pressure_pa: u32,
    /// Hundredths of a degree Celsius.
    pub temperature_cdeg: i16,
}

/// Humidity / temperature reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HumData {
    pub time_ms: u32,
    /// Tenths of a percent relative humidity.
    pub humidity_pm: u16,
    pub temperature_cdeg: i16,
}

/// Magnetometer reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MagData {
    pub time_ms: u32,
    /// Raw axis counts.
    pub x: i16,
    pub y: i16,
    pub z: i16,
    pub temperature_cdeg: i16,
}

/// GNSS navigation solution (subset of UBX-NAV-PVT).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GnssData {
    /// GPS time of week, milliseconds.
    pub itow_ms: u32,
    /// Degrees × 1e7.
    pub lat: i32,
    pub lon: i32,
    /// Height above mean sea level, millimetres.
    pub hmsl_mm: i32,
    /// NED velocity, mm/s.
    pub vel_n: i32,
    pub vel_e: i32,
    pub vel_d: i32,
    /// Horizontal / vertical / speed accuracy estimates.
    pub h_acc: u32,
    pub v_acc: u32,
    pub s_acc: u32,
    pub num_sv: u8,
}

/// UTC time from the GNSS receiver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GnssTime {
    pub itow_ms: u32,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub min: u8,
    pub sec: u8,
}

/// IMU reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImuData {
    pub time_ms: u32,
    /// Angular rate, raw counts.
    pub gyro: [i16; 3],
    /// Acceleration, raw counts.
    pub accel: [i16; 3],
    pub temperature_cdeg: i16,
}
