//! Static checks on a program, so that execution never decodes an unknown action or lands
//! outside of the program.

use crate::{Error, Result};
use crate::action::{Action, OpCode};

pub fn verify<I: IntoIterator<Item = Action>>(actions: I, len: usize) -> Result<()> {
    for (index, action) in actions.into_iter().enumerate() {
        let regno = action.regno() as usize;
        let Some(opcode) = action.opcode() else {
            log::error!("Invalid action {:#010x} at index {}", action.bits(), index);
            return Err(Error::InvalidAction { index, action: action.bits() })
        };
        let out_of_range = match opcode {
            OpCode::PhyRead |
            OpCode::PhyDataOr |
            OpCode::PhyDataAnd |
            OpCode::PhyClearReadCount |
            OpCode::PhyWrite |
            OpCode::PhyWritePrevious |
            OpCode::PhyDelayMs =>
                false,
            OpCode::PhyMdioChg =>
                action.data() > 1,
            OpCode::PhyBjmpn =>
                regno > index,
            OpCode::PhyReadcountEqSkip =>
                index + 2 >= len,
            OpCode::PhyCompEqSkipn |
            OpCode::PhyCompNeqSkipn |
            OpCode::PhySkipn =>
                index + 1 + regno >= len,
        };
        if out_of_range {
            log::error!("Out of range of firmware: {} at index {}", action, index);
            return Err(Error::OutOfRange { index, action: action.bits() })
        }
    }
    Ok(())
}
