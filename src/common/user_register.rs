// src/common/user_register.rs

/// Measurement resolution, selected by bits 7 and 0 of the user register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 12-bit humidity, 14-bit temperature (power-on default).
    Rh12Temp14,
    Rh8Temp12,
    Rh10Temp13,
    Rh11Temp11,
}

impl Resolution {
    const MASK: u8 = 0x81;

    pub const fn bits(self) -> u8 {
        match self {
            Resolution::Rh12Temp14 => 0x00,
            Resolution::Rh8Temp12 => 0x01,
            Resolution::Rh10Temp13 => 0x80,
            Resolution::Rh11Temp11 => 0x81,
        }
    }

    const fn from_register(bits: u8) -> Self {
        match bits & Self::MASK {
            0x00 => Resolution::Rh12Temp14,
            0x01 => Resolution::Rh8Temp12,
            0x80 => Resolution::Rh10Temp13,
            _ => Resolution::Rh11Temp11,
        }
    }
}

/// Contents of the SHT21 user register.
///
/// Bits 3-5 are reserved: their current value must be written back unchanged,
/// see [`UserRegister::merge_into`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UserRegister(u8);

impl UserRegister {
    const END_OF_BATTERY: u8 = 0x40;
    const HEATER: u8 = 0x04;
    const DISABLE_OTP_RELOAD: u8 = 0x02;
    const RESERVED_MASK: u8 = 0x38;

    /// Power-on value: full resolution, heater off, OTP reload disabled.
    pub const DEFAULT: UserRegister = UserRegister(0x02);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn resolution(&self) -> Resolution {
        Resolution::from_register(self.0)
    }

    pub const fn with_resolution(self, resolution: Resolution) -> Self {
        Self((self.0 & !Resolution::MASK) | resolution.bits())
    }

    /// Set by the sensor when VDD drops below 2.25 V. Read-only.
    pub const fn end_of_battery(&self) -> bool {
        self.0 & Self::END_OF_BATTERY != 0
    }

    pub const fn heater_enabled(&self) -> bool {
        self.0 & Self::HEATER != 0
    }

    pub const fn with_heater(self, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | Self::HEATER)
        } else {
            Self(self.0 & !Self::HEATER)
        }
    }

    pub const fn otp_reload_disabled(&self) -> bool {
        self.0 & Self::DISABLE_OTP_RELOAD != 0
    }

    pub const fn with_otp_reload_disabled(self, disabled: bool) -> Self {
        if disabled {
            Self(self.0 | Self::DISABLE_OTP_RELOAD)
        } else {
            Self(self.0 & !Self::DISABLE_OTP_RELOAD)
        }
    }

    /// Combines the settable bits of `self` with the reserved bits of `current`,
    /// producing the value to write back.
    pub const fn merge_into(self, current: UserRegister) -> UserRegister {
        UserRegister((self.0 & !Self::RESERVED_MASK) | (current.0 & Self::RESERVED_MASK))
    }
}

impl Default for UserRegister {
    fn default() -> Self {
        Self::DEFAULT
    }
}
