use bincode::config::{Fixint, LittleEndian};
use bincode::error::{DecodeError, EncodeError};
use bincode::{Decode, Encode};
use std::io;
use std::io::{BufReader, BufWriter, Write};
use thiserror::Error;
use tilecade_config::ArcadeGame;

#[derive(Debug, Error)]
pub enum SaveStateError {
    #[error("error saving state: {source}")]
    Serialization {
        #[from]
        source: EncodeError,
    },
    #[error("error loading state: {source}")]
    Deserialization {
        #[from]
        source: DecodeError,
    },
    #[error("error flushing state: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
    #[error("save state is for {found}, expected {expected}")]
    WrongGame { expected: ArcadeGame, found: ArcadeGame },
}

const BINCODE_CONFIG: bincode::config::Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_little_endian().with_fixed_int_encoding();

/// Write `state` prefixed with the game it belongs to.
///
/// # Errors
///
/// Propagates any encoding or I/O error.
pub fn save_state<T, W>(game: ArcadeGame, state: &T, writer: W) -> Result<(), SaveStateError>
where
    T: Encode,
    W: io::Write,
{
    let mut writer = BufWriter::new(writer);

    bincode::encode_into_std_write(game, &mut writer, BINCODE_CONFIG)?;
    bincode::encode_into_std_write(state, &mut writer, BINCODE_CONFIG)?;
    writer.flush()?;

    Ok(())
}

/// Read a state written by [`save_state`] for the same game.
///
/// # Errors
///
/// Returns [`SaveStateError::WrongGame`] if the state was saved by a different game, or any
/// decoding error.
pub fn load_state<T, R>(game: ArcadeGame, reader: R) -> Result<T, SaveStateError>
where
    T: Decode<()>,
    R: io::Read,
{
    let mut reader = BufReader::new(reader);

    let found: ArcadeGame = bincode::decode_from_std_read(&mut reader, BINCODE_CONFIG)?;
    if found != game {
        return Err(SaveStateError::WrongGame { expected: game, found });
    }

    let state = bincode::decode_from_std_read(&mut reader, BINCODE_CONFIG)?;

    log::debug!("Loaded {game} save state");

    Ok(state)
}
