//! Analog input trait

/// Errors that can occur during an analog conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogError {
    /// Conversion did not finish within its bounded wait
    Timeout,
    /// Converter reported a fault
    Conversion,
}

/// Single-channel analog input
pub trait AnalogInput {
    /// Read one raw conversion in the converter's native range
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    /// May wait for the conversion, but only for a short bounded time.
    fn read_raw(&mut self) -> Result<u16, AnalogError>;
}
