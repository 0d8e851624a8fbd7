use crate::{
    constants::{CLASS_NAV, NAV_PVT_ID, UBX_FRAME_OVERHEAD},
    error::DateTimeError,
    ubx_packets::{write_frame, PayloadReader, Position, UbxPacketMeta, Velocity},
};
use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};
use chrono::prelude::*;

/// GNSS fix Type
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GnssFixType {
    #[default]
    NoFix,
    DeadReckoningOnly,
    Fix2D,
    Fix3D,
    GPSPlusDeadReckoning,
    TimeOnlyFix,
    /// Value outside the documented range, kept as received
    Reserved(u8),
}

impl GnssFixType {
    pub const fn into_raw(self) -> u8 {
        match self {
            GnssFixType::NoFix => 0,
            GnssFixType::DeadReckoningOnly => 1,
            GnssFixType::Fix2D => 2,
            GnssFixType::Fix3D => 3,
            GnssFixType::GPSPlusDeadReckoning => 4,
            GnssFixType::TimeOnlyFix => 5,
            GnssFixType::Reserved(raw) => raw,
        }
    }

    /// Fix carries a usable position and velocity
    pub fn has_position(self) -> bool {
        matches!(self, GnssFixType::Fix3D | GnssFixType::GPSPlusDeadReckoning)
    }

    /// Fix carries a usable time
    pub fn has_time(self) -> bool {
        matches!(
            self,
            GnssFixType::Fix3D | GnssFixType::GPSPlusDeadReckoning | GnssFixType::TimeOnlyFix
        )
    }
}

impl From<u8> for GnssFixType {
    fn from(raw: u8) -> Self {
        match raw {
            0 => GnssFixType::NoFix,
            1 => GnssFixType::DeadReckoningOnly,
            2 => GnssFixType::Fix2D,
            3 => GnssFixType::Fix3D,
            4 => GnssFixType::GPSPlusDeadReckoning,
            5 => GnssFixType::TimeOnlyFix,
            other => GnssFixType::Reserved(other),
        }
    }
}

bitflags! {
    /// Validity flags
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NavPvtValidFlags: u8 {
        /// 1 = valid UTC Date
        const VALID_DATE = 0x01;
        /// 1 = valid UTC time of day
        const VALID_TIME = 0x02;
        /// 1 = UTC time of day has been fully resolved (no seconds uncertainty).
        /// Cannot be used to check if time is completely solved.
        const FULLY_RESOLVED = 0x04;
        /// 1 = valid magnetic declination
        const VALID_MAG = 0x08;
    }
}

bitflags! {
    /// Fix status flags for `NavPvt`
    ///
    /// Bits 2..4 carry the power save mode state and bits 6..7 the carrier
    /// phase solution status; both are multi-bit fields read through
    /// [`NavPvtFlags::psm_state`] and [`NavPvtFlags::carrier_solution`].
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NavPvtFlags: u8 {
        /// 1 = Position and velocity valid and within DOP and accuracy masks
        const GPS_FIX_OK = 0x01;
        /// 1 = Differential corrections were applied; DGPS used
        const DIFF_SOLN = 0x02;
        /// 1 = Heading of vehicle is valid, only set if the receiver is in sensor fusion mode
        const HEAD_VEH_VALID = 0x20;
        /// 1 = Carrier phase range solution with floating ambiguities
        const CARR_SOLN_FLOAT = 0x40;
        /// 1 = Carrier phase range solution with fixed ambiguities
        const CARR_SOLN_FIXED = 0x80;

        const _ = !0;
    }
}

/// Carrier phase range solution status, bits 6..7 of `flags`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CarrierPhaseSolution {
    None,
    FloatingAmbiguities,
    FixedAmbiguities,
    Invalid,
}

impl NavPvtFlags {
    const PSM_STATE_SHIFT: u8 = 2;
    const PSM_STATE_MASK: u8 = 0b0001_1100;
    const CARR_SOLN_SHIFT: u8 = 6;
    const CARR_SOLN_MASK: u8 = 0b1100_0000;

    /// Power save mode state (0 = not active / not enabled)
    pub fn psm_state(self) -> u8 {
        (self.bits() & Self::PSM_STATE_MASK) >> Self::PSM_STATE_SHIFT
    }

    pub fn carrier_solution(self) -> CarrierPhaseSolution {
        match (self.bits() & Self::CARR_SOLN_MASK) >> Self::CARR_SOLN_SHIFT {
            0 => CarrierPhaseSolution::None,
            1 => CarrierPhaseSolution::FloatingAmbiguities,
            2 => CarrierPhaseSolution::FixedAmbiguities,
            _ => CarrierPhaseSolution::Invalid,
        }
    }
}

bitflags! {
    /// Additional flags for `NavPvt`
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NavPvtFlags2: u8 {
        /// 1 = information about UTC Date and Time of Day validity confirmation
        /// is available.
        const CONFIRMED_AVAI = 0x20;
        /// 1 = UTC Date validity could be confirmed
        /// (confirmed by using an additional independent source)
        const CONFIRMED_DATE = 0x40;
        /// 1 = UTC Time of Day could be confirmed
        /// (confirmed by using an additional independent source)
        const CONFIRMED_TIME = 0x80;

        const _ = !0;
    }
}

/// Additional flags, a 16 bit field with a multi-bit correction age
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavPvtFlags3 {
    raw: u16,
}

impl NavPvtFlags3 {
    const INVALID_LLH_MASK: u16 = 0x0001;
    const LAST_CORRECTION_AGE_SHIFT: u16 = 1;
    const LAST_CORRECTION_AGE_MASK: u16 = 0b0000_0000_0001_1110;

    /// 1 = Invalid lon, lat, height and hMSL
    pub fn invalid_llh(&self) -> bool {
        self.raw & Self::INVALID_LLH_MASK != 0
    }

    /// Age of the most recently received differential correction
    ///
    /// Values:
    /// - `0`: Not available
    /// - `1`: Age between 0 and 1 second
    /// - `2`: Age between 1 (inclusive) and 2 seconds
    /// - `3`: Age between 2 (inclusive) and 5 seconds
    /// - `4`: Age between 5 (inclusive) and 10 seconds
    /// - `5`: Age between 10 (inclusive) and 15 seconds
    /// - `6`: Age between 15 (inclusive) and 20 seconds
    /// - `7`: Age between 20 (inclusive) and 30 seconds
    /// - `8`: Age between 30 (inclusive) and 45 seconds
    /// - `9`: Age between 45 (inclusive) and 60 seconds
    /// - `10`: Age between 60 (inclusive) and 90 seconds
    /// - `11`: Age between 90 (inclusive) and 120 seconds
    /// - `>=12`: Age greater or equal than 120 seconds
    pub fn last_correction_age(&self) -> u8 {
        ((self.raw & Self::LAST_CORRECTION_AGE_MASK) >> Self::LAST_CORRECTION_AGE_SHIFT) as u8
    }

    pub fn bits(&self) -> u16 {
        self.raw
    }
}

impl From<u16> for NavPvtFlags3 {
    fn from(raw: u16) -> Self {
        Self { raw }
    }
}

/// Navigation Position Velocity Time Solution
///
/// Every scaled quantity is kept as the integer the receiver sent; the
/// accessor methods apply the scale factor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavPvt {
    /// GPS Millisecond time of week of the navigation epoch.
    ///
    /// Messages with the same iTOW value can be assumed to have come from the same navigation solution.
    pub itow: u32,
    /// Year (UTC)
    pub year: u16,
    /// Month, range 1..12 (UTC)
    pub month: u8,
    /// Day of month, range 1..31 (UTC)
    pub day: u8,
    /// Hour of day, range 0..23 (UTC)
    pub hour: u8,
    /// Minute of hour, range 0..59 (UTC)
    pub min: u8,
    /// Seconds of minute, range 0..60 (UTC)
    pub sec: u8,
    pub valid: NavPvtValidFlags,
    /// Time accuracy estimate in nanoseconds (UTC)
    pub time_accuracy: u32,
    /// Fraction of second, range -1e9 .. 1e9 (UTC)
    pub nanosec: i32,
    pub fix_type: GnssFixType,
    pub flags: NavPvtFlags,
    pub flags2: NavPvtFlags2,
    /// Number of satellites used in Nav Solution
    pub num_satellites: u8,
    /// Longitude, 1e-7 deg
    pub lon: i32,
    /// Latitude, 1e-7 deg
    pub lat: i32,
    /// Height above reference ellipsoid, mm
    pub height: i32,
    /// Height above mean sea level, mm
    pub height_msl: i32,
    /// Horizontal accuracy estimate, mm
    pub h_acc: u32,
    /// Vertical accuracy estimate, mm
    pub v_acc: u32,
    /// NED north velocity, mm/s
    pub vel_north: i32,
    /// NED east velocity, mm/s
    pub vel_east: i32,
    /// NED down velocity, mm/s
    pub vel_down: i32,
    /// Ground speed (2-D), mm/s
    pub g_speed: i32,
    /// Heading of motion (2-D), 1e-5 deg
    pub head_motion: i32,
    /// Speed accuracy estimate, mm/s
    pub s_acc: u32,
    /// Heading accuracy estimate (both motion and vehicle), 1e-5 deg
    pub head_acc: u32,
    /// Position DOP, 0.01
    pub pdop: u16,
    pub flags3: NavPvtFlags3,
    pub reserved1: [u8; 4],
    /// Heading of vehicle (2-D), 1e-5 deg
    pub head_vehicle: i32,
    /// Magnetic declination, 1e-2 deg
    pub magnetic_declination: i16,
    /// Magnetic declination accuracy, 1e-2 deg
    pub magnetic_declination_accuracy: u16,
}

impl UbxPacketMeta for NavPvt {
    const CLASS: u8 = CLASS_NAV;
    const ID: u8 = NAV_PVT_ID;
    const PAYLOAD_LEN: usize = 92;
    const NAME: &'static str = "NAV-PVT";
}

// Payload offsets
const ITOW: usize = 0;
const YEAR: usize = 4;
const MONTH: usize = 6;
const DAY: usize = 7;
const HOUR: usize = 8;
const MIN: usize = 9;
const SEC: usize = 10;
const VALID: usize = 11;
const T_ACC: usize = 12;
const NANO: usize = 16;
const FIX_TYPE: usize = 20;
const FLAGS: usize = 21;
const FLAGS2: usize = 22;
const NUM_SV: usize = 23;
const LON: usize = 24;
const LAT: usize = 28;
const HEIGHT: usize = 32;
const H_MSL: usize = 36;
const H_ACC: usize = 40;
const V_ACC: usize = 44;
const VEL_N: usize = 48;
const VEL_E: usize = 52;
const VEL_D: usize = 56;
const G_SPEED: usize = 60;
const HEAD_MOT: usize = 64;
const S_ACC: usize = 68;
const HEAD_ACC: usize = 72;
const P_DOP: usize = 76;
const FLAGS3: usize = 78;
const RESERVED1: usize = 80;
const HEAD_VEH: usize = 84;
const MAG_DEC: usize = 88;
const MAG_ACC: usize = 90;

impl NavPvt {
    pub const FRAME_LEN: usize = Self::PAYLOAD_LEN + UBX_FRAME_OVERHEAD;

    /// Best-effort decode: missing trailing bytes read as zero, extra bytes are ignored
    pub fn from_payload(payload: &[u8]) -> Self {
        let r = PayloadReader::new(payload);
        Self {
            itow: r.u32(ITOW),
            year: r.u16(YEAR),
            month: r.u8(MONTH),
            day: r.u8(DAY),
            hour: r.u8(HOUR),
            min: r.u8(MIN),
            sec: r.u8(SEC),
            valid: NavPvtValidFlags::from_bits_retain(r.u8(VALID)),
            time_accuracy: r.u32(T_ACC),
            nanosec: r.i32(NANO),
            fix_type: r.u8(FIX_TYPE).into(),
            flags: NavPvtFlags::from_bits_retain(r.u8(FLAGS)),
            flags2: NavPvtFlags2::from_bits_retain(r.u8(FLAGS2)),
            num_satellites: r.u8(NUM_SV),
            lon: r.i32(LON),
            lat: r.i32(LAT),
            height: r.i32(HEIGHT),
            height_msl: r.i32(H_MSL),
            h_acc: r.u32(H_ACC),
            v_acc: r.u32(V_ACC),
            vel_north: r.i32(VEL_N),
            vel_east: r.i32(VEL_E),
            vel_down: r.i32(VEL_D),
            g_speed: r.i32(G_SPEED),
            head_motion: r.i32(HEAD_MOT),
            s_acc: r.u32(S_ACC),
            head_acc: r.u32(HEAD_ACC),
            pdop: r.u16(P_DOP),
            flags3: r.u16(FLAGS3).into(),
            reserved1: r.bytes::<4>(RESERVED1),
            head_vehicle: r.i32(HEAD_VEH),
            magnetic_declination: r.i16(MAG_DEC),
            magnetic_declination_accuracy: r.u16(MAG_ACC),
        }
    }

    /// Inverse of [`from_payload`](Self::from_payload) for a full-length payload
    pub fn to_payload(&self) -> [u8; Self::PAYLOAD_LEN] {
        let mut p = [0u8; Self::PAYLOAD_LEN];
        LittleEndian::write_u32(&mut p[ITOW..], self.itow);
        LittleEndian::write_u16(&mut p[YEAR..], self.year);
        p[MONTH] = self.month;
        p[DAY] = self.day;
        p[HOUR] = self.hour;
        p[MIN] = self.min;
        p[SEC] = self.sec;
        p[VALID] = self.valid.bits();
        LittleEndian::write_u32(&mut p[T_ACC..], self.time_accuracy);
        LittleEndian::write_i32(&mut p[NANO..], self.nanosec);
        p[FIX_TYPE] = self.fix_type.into_raw();
        p[FLAGS] = self.flags.bits();
        p[FLAGS2] = self.flags2.bits();
        p[NUM_SV] = self.num_satellites;
        LittleEndian::write_i32(&mut p[LON..], self.lon);
        LittleEndian::write_i32(&mut p[LAT..], self.lat);
        LittleEndian::write_i32(&mut p[HEIGHT..], self.height);
        LittleEndian::write_i32(&mut p[H_MSL..], self.height_msl);
        LittleEndian::write_u32(&mut p[H_ACC..], self.h_acc);
        LittleEndian::write_u32(&mut p[V_ACC..], self.v_acc);
        LittleEndian::write_i32(&mut p[VEL_N..], self.vel_north);
        LittleEndian::write_i32(&mut p[VEL_E..], self.vel_east);
        LittleEndian::write_i32(&mut p[VEL_D..], self.vel_down);
        LittleEndian::write_i32(&mut p[G_SPEED..], self.g_speed);
        LittleEndian::write_i32(&mut p[HEAD_MOT..], self.head_motion);
        LittleEndian::write_u32(&mut p[S_ACC..], self.s_acc);
        LittleEndian::write_u32(&mut p[HEAD_ACC..], self.head_acc);
        LittleEndian::write_u16(&mut p[P_DOP..], self.pdop);
        LittleEndian::write_u16(&mut p[FLAGS3..], self.flags3.bits());
        p[RESERVED1..RESERVED1 + 4].copy_from_slice(&self.reserved1);
        LittleEndian::write_i32(&mut p[HEAD_VEH..], self.head_vehicle);
        LittleEndian::write_i16(&mut p[MAG_DEC..], self.magnetic_declination);
        LittleEndian::write_u16(&mut p[MAG_ACC..], self.magnetic_declination_accuracy);
        p
    }

    /// Complete frame carrying this solution, as the receiver would send it
    pub fn into_packet_bytes(&self) -> [u8; Self::FRAME_LEN] {
        let mut ret = [0u8; Self::FRAME_LEN];
        write_frame(Self::CLASS, Self::ID, &self.to_payload(), &mut ret);
        ret
    }

    /// Longitude in \[deg\]
    pub fn longitude(&self) -> f64 {
        f64::from(self.lon) * 1e-7
    }

    /// Latitude in \[deg\]
    pub fn latitude(&self) -> f64 {
        f64::from(self.lat) * 1e-7
    }

    /// Height above reference ellipsoid in \[m\]
    pub fn height_above_ellipsoid(&self) -> f64 {
        f64::from(self.height) * 1e-3
    }

    /// Height above Mean Sea Level in \[m\]
    pub fn height_msl_m(&self) -> f64 {
        f64::from(self.height_msl) * 1e-3
    }

    /// Horizontal accuracy in \[m\]
    pub fn horizontal_accuracy(&self) -> f64 {
        f64::from(self.h_acc) * 1e-3
    }

    /// Vertical accuracy in \[m\]
    pub fn vertical_accuracy(&self) -> f64 {
        f64::from(self.v_acc) * 1e-3
    }

    /// Velocity north, east, down in \[m/s\]
    pub fn vel_ned(&self) -> (f64, f64, f64) {
        (
            f64::from(self.vel_north) * 1e-3,
            f64::from(self.vel_east) * 1e-3,
            f64::from(self.vel_down) * 1e-3,
        )
    }

    /// Ground speed \[m/s\]
    pub fn ground_speed_2d(&self) -> f64 {
        f64::from(self.g_speed) * 1e-3
    }

    /// Heading of motion 2-D \[deg\]
    pub fn heading_motion(&self) -> f64 {
        f64::from(self.head_motion) * 1e-5
    }

    /// Speed Accuracy Estimate \[m/s\]
    pub fn speed_accuracy(&self) -> f64 {
        f64::from(self.s_acc) * 1e-3
    }

    /// Heading accuracy estimate (for both vehicle and motion) \[deg\]
    pub fn heading_accuracy(&self) -> f64 {
        f64::from(self.head_acc) * 1e-5
    }

    /// Heading of vehicle (2-D) \[deg\]
    pub fn heading_vehicle(&self) -> f64 {
        f64::from(self.head_vehicle) * 1e-5
    }

    pub fn pdop_value(&self) -> f64 {
        f64::from(self.pdop) * 1e-2
    }

    /// Magnetic declination \[deg\]
    pub fn magnetic_declination_deg(&self) -> f64 {
        f64::from(self.magnetic_declination) * 1e-2
    }

    /// Position and velocity valid and within DOP and accuracy masks
    pub fn is_fix_ok(&self) -> bool {
        self.flags.contains(NavPvtFlags::GPS_FIX_OK)
    }

    pub fn has_valid_date_time(&self) -> bool {
        self.valid
            .contains(NavPvtValidFlags::VALID_DATE | NavPvtValidFlags::VALID_TIME)
    }
}

impl From<&NavPvt> for Position {
    fn from(packet: &NavPvt) -> Self {
        Position {
            lon: packet.longitude(),
            lat: packet.latitude(),
            alt: packet.height_msl_m(),
        }
    }
}

impl From<&NavPvt> for Velocity {
    fn from(packet: &NavPvt) -> Self {
        Velocity {
            speed: packet.ground_speed_2d(),
            heading: packet.heading_motion(),
        }
    }
}

impl TryFrom<&NavPvt> for DateTime<Utc> {
    type Error = DateTimeError;

    fn try_from(sol: &NavPvt) -> Result<Self, Self::Error> {
        let date = NaiveDate::from_ymd_opt(
            i32::from(sol.year),
            u32::from(sol.month),
            u32::from(sol.day),
        )
        .ok_or(DateTimeError::InvalidDate)?;
        let time = NaiveTime::from_hms_opt(
            u32::from(sol.hour),
            u32::from(sol.min),
            u32::from(sol.sec),
        )
        .ok_or(DateTimeError::InvalidTime)?;
        const NANOS_LIM: u32 = 1_000_000_000;
        if sol.nanosec.unsigned_abs() >= NANOS_LIM {
            return Err(DateTimeError::InvalidNanoseconds);
        }

        let dt = NaiveDateTime::new(date, time);
        // The receiver reports a signed fraction relative to the rounded second
        let dt = dt + chrono::Duration::nanoseconds(i64::from(sol.nanosec));
        Ok(Utc.from_utc_datetime(&dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NavPvt {
        NavPvt {
            itow: 345_600_250,
            year: 2025,
            month: 5,
            day: 4,
            hour: 12,
            min: 30,
            sec: 15,
            valid: NavPvtValidFlags::VALID_DATE
                | NavPvtValidFlags::VALID_TIME
                | NavPvtValidFlags::FULLY_RESOLVED,
            time_accuracy: 30,
            nanosec: -250_000,
            fix_type: GnssFixType::Fix3D,
            flags: NavPvtFlags::GPS_FIX_OK | NavPvtFlags::CARR_SOLN_FIXED,
            flags2: NavPvtFlags2::CONFIRMED_AVAI,
            num_satellites: 11,
            lon: -1_050_000_000,
            lat: 400_000_000,
            height: 1_655_123,
            height_msl: 1_672_456,
            h_acc: 1_500,
            v_acc: 2_300,
            vel_north: 120,
            vel_east: -340,
            vel_down: 5,
            g_speed: 361,
            head_motion: 28_012_345,
            s_acc: 80,
            head_acc: 1_234_567,
            pdop: 145,
            flags3: NavPvtFlags3::from(0b0000_0000_0000_0110),
            reserved1: [1, 2, 3, 4],
            head_vehicle: 28_000_000,
            magnetic_declination: -512,
            magnetic_declination_accuracy: 30,
        }
    }

    #[test]
    fn payload_offsets() {
        let p = sample().to_payload();
        assert_eq!(&p[24..28], &(-1_050_000_000i32).to_le_bytes());
        assert_eq!(&p[28..32], &400_000_000i32.to_le_bytes());
        assert_eq!(p[20], 3);
        assert_eq!(p[23], 11);
        assert_eq!(&p[4..6], &2025u16.to_le_bytes());
        assert_eq!(&p[88..90], &(-512i16).to_le_bytes());
    }

    #[test]
    fn decode_inverts_encode() {
        let pvt = sample();
        assert_eq!(NavPvt::from_payload(&pvt.to_payload()), pvt);
    }

    #[test]
    fn scaled_accessors() {
        let pvt = sample();
        assert!((pvt.latitude() - 40.0).abs() < 1e-9);
        assert!((pvt.longitude() + 105.0).abs() < 1e-9);
        assert!((pvt.height_msl_m() - 1672.456).abs() < 1e-9);
        assert!((pvt.heading_motion() - 280.12345).abs() < 1e-9);
        assert!((pvt.ground_speed_2d() - 0.361).abs() < 1e-12);
        let (n, e, d) = pvt.vel_ned();
        assert!((n - 0.12).abs() < 1e-12 && (e + 0.34).abs() < 1e-12 && (d - 0.005).abs() < 1e-12);
        assert!((pvt.pdop_value() - 1.45).abs() < 1e-12);
    }

    #[test]
    fn flag_fields() {
        let pvt = sample();
        assert!(pvt.is_fix_ok());
        assert!(pvt.has_valid_date_time());
        assert_eq!(
            pvt.flags.carrier_solution(),
            CarrierPhaseSolution::FixedAmbiguities
        );
        assert_eq!(pvt.flags.psm_state(), 0);
        assert!(!pvt.flags3.invalid_llh());
        assert_eq!(pvt.flags3.last_correction_age(), 3);

        let flags = NavPvtFlags::from_bits_retain(0b0101_1001);
        assert!(flags.contains(NavPvtFlags::GPS_FIX_OK));
        assert!(!flags.contains(NavPvtFlags::DIFF_SOLN));
        assert_eq!(flags.psm_state(), 0b110);
        assert_eq!(
            flags.carrier_solution(),
            CarrierPhaseSolution::FloatingAmbiguities
        );
    }

    #[test]
    fn fix_type_round_trip_keeps_reserved_values() {
        for raw in 0..=u8::MAX {
            assert_eq!(GnssFixType::from(raw).into_raw(), raw);
        }
        assert!(GnssFixType::Fix3D.has_position());
        assert!(!GnssFixType::TimeOnlyFix.has_position());
        assert!(GnssFixType::TimeOnlyFix.has_time());
        assert!(!GnssFixType::Fix2D.has_time());
    }

    #[test]
    fn short_payload_is_zero_padded() {
        let p = sample().to_payload();
        let pvt = NavPvt::from_payload(&p[..32]);
        assert_eq!(pvt.lat, 400_000_000);
        assert_eq!(pvt.height, 0);
        assert_eq!(pvt.magnetic_declination_accuracy, 0);
    }

    #[test]
    fn date_time_conversion() {
        let pvt = sample();
        let dt: DateTime<Utc> = (&pvt).try_into().unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.second(), 14);
        assert_eq!(dt.nanosecond(), 999_750_000);

        let bad = NavPvt { month: 13, ..pvt };
        assert_eq!(
            DateTime::<Utc>::try_from(&bad),
            Err(DateTimeError::InvalidDate)
        );
        let bad = NavPvt { hour: 24, ..pvt };
        assert_eq!(
            DateTime::<Utc>::try_from(&bad),
            Err(DateTimeError::InvalidTime)
        );
        let bad = NavPvt {
            nanosec: 1_000_000_000,
            ..pvt
        };
        assert_eq!(
            DateTime::<Utc>::try_from(&bad),
            Err(DateTimeError::InvalidNanoseconds)
        );
    }

    #[test]
    fn position_and_velocity() {
        let pvt = sample();
        let pos: Position = (&pvt).into();
        let vel: Velocity = (&pvt).into();
        assert!((pos.lat - 40.0).abs() < 1e-9);
        assert!((vel.heading - 280.12345).abs() < 1e-9);
    }
}
