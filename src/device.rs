use crate::{Error, Result};
use crate::sys::Driver;
use crate::action::{Action, OpCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bus {
    #[default]
    Phy,
    MacMcu,
}

/// Interpreter registers, live across the actions of one program.
#[derive(Debug, Clone, Copy, Default)]
struct State {
    bus: Bus,
    predata: u16,
    count: u32,
}

#[derive(Debug)]
pub struct Device<D: Driver> {
    driver: D,
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
impl Device<crate::sys::imp::MdioDriverImpl> {
    /// Access the PHY attached to network interface `interface`.
    pub fn open(interface: &str) -> Result<Device<crate::sys::imp::MdioDriverImpl>> {
        let driver = crate::sys::imp::MdioDriverImpl::new(interface)?;
        Ok(Device { driver })
    }
}

impl<D: Driver> Device<D> {
    pub fn with_driver(driver: D) -> Device<D> {
        Device { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn read(&mut self, bus: Bus, reg: u16) -> Result<u16> {
        let value = match bus {
            Bus::Phy => self.driver.phy_read(reg)?,
            Bus::MacMcu => self.driver.mac_mcu_read(reg)?,
        };
        log::trace!("read({:?}, {:#x}) = {:#06x}", bus, reg, value);
        Ok(value)
    }

    pub fn write(&mut self, bus: Bus, reg: u16, value: u16) -> Result<()> {
        log::trace!("write({:?}, {:#x}, {:#06x})", bus, reg, value);
        match bus {
            Bus::Phy => self.driver.phy_write(reg, value),
            Bus::MacMcu => self.driver.mac_mcu_write(reg, value),
        }
    }

    pub fn modify<F: FnOnce(&mut u16)>(&mut self, bus: Bus, reg: u16, f: F) -> Result<()> {
        let mut value = self.read(bus, reg)?;
        f(&mut value);
        self.write(bus, reg, value)
    }

    /// Run a PHY patch program.
    ///
    /// The program is expected to have passed verification; actions that would still leave it
    /// (an unknown opcode, a jump before the first action) are reported as errors rather than
    /// executed. Skips past the last action end the program. Execution is abandoned after
    /// `max_steps` actions.
    pub fn write_firmware(&mut self, actions: &[Action], max_steps: usize) -> Result<()> {
        self.execute(actions, max_steps, &mut State::default())
    }

    fn execute(&mut self, actions: &[Action], max_steps: usize, state: &mut State) -> Result<()> {
        let State { bus, predata, count } = state;
        let mut index = 0;
        let mut steps = 0;
        while index < actions.len() {
            if steps == max_steps {
                log::error!("firmware still running after {} steps, at index {}", steps, index);
                return Err(Error::StepLimit(max_steps))
            }
            steps += 1;

            let action = actions[index];
            let regno = action.regno();
            let data = action.data();
            let Some(opcode) = action.opcode() else {
                log::error!("Invalid action {:#010x}", action.bits());
                return Err(Error::InvalidAction { index, action: action.bits() })
            };
            log::debug!("[{:4}] {}", index, action);

            let mut next = index + 1;
            match opcode {
                OpCode::PhyRead => {
                    *predata = self.read(*bus, regno)?;
                    *count = count.wrapping_add(1);
                }
                OpCode::PhyDataOr =>
                    *predata |= data,
                OpCode::PhyDataAnd =>
                    *predata &= data,
                OpCode::PhyBjmpn => {
                    next = index.checked_sub(regno as usize)
                        .ok_or(Error::OutOfRange { index, action: action.bits() })?;
                }
                OpCode::PhyMdioChg =>
                    *bus = if data != 0 { Bus::MacMcu } else { Bus::Phy },
                OpCode::PhyClearReadCount =>
                    *count = 0,
                OpCode::PhyWrite =>
                    self.write(*bus, regno, data)?,
                OpCode::PhyReadcountEqSkip =>
                    if *count == u32::from(data) { next += 1 },
                OpCode::PhyCompEqSkipn =>
                    if *predata == data { next += regno as usize },
                OpCode::PhyCompNeqSkipn =>
                    if *predata != data { next += regno as usize },
                OpCode::PhyWritePrevious =>
                    self.write(*bus, regno, *predata)?,
                OpCode::PhySkipn =>
                    next += regno as usize,
                OpCode::PhyDelayMs =>
                    self.driver.delay_ms(data),
            }
            index = next;
        }
        log::debug!("firmware done after {} steps", steps);
        Ok(())
    }
}
