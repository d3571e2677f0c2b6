use embedded_hal::spi::Mode;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Collision;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferStatus {
    pub transfer_complete: bool,
    pub write_collision: bool,
}

// Full duplex: `get` returns the byte the host sent while the last `put`
// was clocked out
pub trait ByteTransport {
    fn init_as_responder(&mut self, mode: Mode);

    fn put(&mut self, byte: u8) -> Result<(), Collision>;

    fn get(&mut self) -> u8;

    fn wait(&mut self);

    fn status(&self) -> TransferStatus;

    fn release(&mut self);

    fn send(&mut self, byte: u8) -> Result<(), Collision> {
        self.put(byte)?;
        self.wait();
        Ok(())
    }
}
