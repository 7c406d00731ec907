use std::iter::FusedIterator;

use jr3pci_ioctl::registers::{counter_offset, filter_offset, FORCE_WORDS};
use jr3pci_ioctl::{transact, ReadWordRequest, SupportedChannelsRequest, WriteWordRequest};
use jr3pci_transport::{ControlDevice, Jr3PciDevice, TransportError};
use tracing::debug;

use crate::error::Result;
use crate::sample::{ChannelMask, ClockedForceArray, ForceArray};

/// A JR3 PCI card reached through a [`ControlDevice`].
///
/// Each method maps onto one or more blocking driver requests and returns
/// only once they complete. Owning the device means owning the handle:
/// dropping a `Jr3Pci<Jr3PciDevice>` closes it.
pub struct Jr3Pci<D> {
    device: D,
}

impl Jr3Pci<Jr3PciDevice> {
    /// Open card `index` (`\\.\JR3PCI<index>`).
    pub fn open(index: u32) -> Result<Self> {
        Ok(Self::new(Jr3PciDevice::open(index)?))
    }
}

impl<D: ControlDevice> Jr3Pci<D> {
    /// Wrap an already-open device.
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// Borrow the underlying device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutably borrow the underlying device.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Release the underlying device.
    pub fn into_inner(self) -> D {
        self.device
    }

    /// Raw bitmap of populated channels, exactly as the driver reports it.
    pub fn supported_channels(&mut self) -> Result<u32> {
        let response = transact(&mut self.device, &SupportedChannelsRequest)?;
        debug!(bitmap = response.bitmap, "supported channels");
        Ok(response.bitmap)
    }

    /// Populated channels as a [`ChannelMask`].
    pub fn channel_mask(&mut self) -> Result<ChannelMask> {
        self.supported_channels().map(ChannelMask)
    }

    /// Read one register word.
    pub fn read_word(&mut self, channel: u8, offset: u32) -> Result<u16> {
        let response = transact(&mut self.device, &ReadWordRequest { channel, offset })?;
        Ok(response.data)
    }

    /// Write one register word.
    pub fn write_word(&mut self, channel: u8, offset: u32, value: u16) -> Result<()> {
        transact(
            &mut self.device,
            &WriteWordRequest {
                channel,
                offset,
                data: value,
            },
        )?;
        debug!(channel, offset, value, "wrote register word");
        Ok(())
    }

    /// Lazily read `count` words at `offset`, `offset + 1`, ...
    ///
    /// Each item is one read-word request, issued when the item is pulled.
    /// The first failure is yielded and ends the sequence.
    pub fn read_words(&mut self, channel: u8, offset: u32, count: u32) -> ReadWords<'_, D> {
        ReadWords {
            card: self,
            channel,
            next: offset,
            remaining: count,
        }
    }

    /// Fill `buf` with the words at `offset`, `offset + 1`, ...
    ///
    /// The count is `buf.len()`, which must fit in a `u32`. On error, `buf`
    /// may hold the words read before the failure.
    pub fn read_words_into(&mut self, channel: u8, offset: u32, buf: &mut [u16]) -> Result<()> {
        let count = word_count(buf.len())?;
        for (slot, word) in buf.iter_mut().zip(self.read_words(channel, offset, count)) {
            *slot = word?;
        }
        Ok(())
    }

    /// Read `N` consecutive words into an array.
    pub fn read_array<const N: usize>(&mut self, channel: u8, offset: u32) -> Result<[u16; N]> {
        let mut words = [0u16; N];
        self.read_words_into(channel, offset, &mut words)?;
        Ok(words)
    }

    /// Force/torque block for `filter` (eight words at `0x90 + 8 * filter`).
    pub fn force_array(&mut self, channel: u8, filter: u8) -> Result<ForceArray> {
        let words: [u16; FORCE_WORDS] = self.read_array(channel, filter_offset(filter))?;
        Ok(ForceArray::from_words(words))
    }

    /// Sample counter for `filter` followed by its force/torque block.
    ///
    /// The counter (at `COUNT1 - 1 + filter`) and the block are read in two
    /// separate driver requests. The firmware may advance between them, so
    /// the counter can be one or more cycles older than the block.
    pub fn clocked_force_array(&mut self, channel: u8, filter: u8) -> Result<ClockedForceArray> {
        let count = self.read_word(channel, counter_offset(filter))?;
        let forces = self.force_array(channel, filter)?;
        Ok(ClockedForceArray { count, forces })
    }
}

fn word_count(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| TransportError::BufferTooLarge { len }.into())
}

impl<D: ControlDevice> std::fmt::Debug for Jr3Pci<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jr3Pci")
            .field("device", &self.device.describe())
            .finish()
    }
}

/// Iterator returned by [`Jr3Pci::read_words`].
pub struct ReadWords<'a, D> {
    card: &'a mut Jr3Pci<D>,
    channel: u8,
    next: u32,
    remaining: u32,
}

impl<D: ControlDevice> Iterator for ReadWords<'_, D> {
    type Item = Result<u16>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let offset = self.next;
        self.next = self.next.wrapping_add(1);
        self.remaining -= 1;

        let word = self.card.read_word(self.channel, offset);
        if word.is_err() {
            self.remaining = 0;
        }
        Some(word)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}

impl<D: ControlDevice> FusedIterator for ReadWords<'_, D> {}
