//! The flipper contract: a single boolean that starts out `true` and is
//! toggled by `flipping`, which emits the new value.

use parity_scale_codec::{
    Decode,
    Encode,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::contract::{
    ContractCode,
    ContractEvent,
    Env,
    ExecError,
    ExecResult,
    MessageSpec,
};

const STATE_KEY: &[u8] = b"state";

pub const FLIP: &str = "flip";
pub const FLIPPING: &str = "flipping";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Flipped {
    pub state: bool,
}

impl ContractEvent for Flipped {
    const NAME: &'static str = "Flipped";
    const SIGNATURE: &'static str = "Flipped(bool)";
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Flipper;

impl Flipper {
    fn state(env: &Env<'_>) -> Result<bool, ExecError> {
        env.get(STATE_KEY)?
            .ok_or_else(|| ExecError::Revert("flipper state is not initialized".into()))
    }
}

impl ContractCode for Flipper {
    fn name(&self) -> &'static str {
        "Flipper"
    }

    fn messages(&self) -> Vec<MessageSpec> {
        vec![MessageSpec::new(FLIP, false), MessageSpec::new(FLIPPING, true)]
    }

    fn deploy(&self, env: &mut Env<'_>, _input: &[u8]) -> Result<(), ExecError> {
        env.set(STATE_KEY, &true)
    }

    fn call(&self, env: &mut Env<'_>, message: &MessageSpec, _input: &[u8]) -> ExecResult {
        match message.name {
            FLIP => Ok(Self::state(env)?.encode()),
            FLIPPING => {
                let state = !Self::state(env)?;
                env.set(STATE_KEY, &state)?;
                env.emit(&Flipped { state })?;
                Ok(Vec::new())
            }
            other => Err(ExecError::UnknownMessage(other.to_string())),
        }
    }
}
