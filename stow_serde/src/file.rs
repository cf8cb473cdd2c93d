//! Saving and loading values

use crate::{Codec, Result, Value};
use log::debug;
use serde::{de::DeserializeOwned, ser::Serialize};
use std::{
    fs::{File, OpenOptions},
    io::{Read, Write},
    path::Path,
};

impl Codec {
    /// Writes a value to a file, replacing whatever was there
    ///
    /// The value is encoded before the file is touched, so a value that
    /// cannot be encoded leaves any existing file intact.
    pub fn save<T, P>(&self, value: &T, path: P) -> Result<()>
    where
        T: Serialize + ?Sized,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let bytes = self.encode(value)?;
        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        debug!("saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    /// Writes a value to a file that must not exist yet
    pub fn save_new<T, P>(&self, value: &T, path: P) -> Result<()>
    where
        T: Serialize + ?Sized,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let bytes = self.encode(value)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        debug!("saved {} bytes to new {}", bytes.len(), path.display());
        Ok(())
    }

    /// Reads a value back from a file
    ///
    /// Files larger than the limit are refused before they are read.
    pub fn load<T, P>(&self, path: P) -> Result<T>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.check_decoding_limit(file.metadata()?.len())?;
        let mut bytes = Vec::new();
        let cap = self.limit().map_or(u64::max_value(), |l| l.saturating_add(1));
        file.take(cap).read_to_end(&mut bytes)?;
        let x = self.decode(&bytes)?;
        debug!("loaded {} bytes from {}", bytes.len(), path.display());
        Ok(x)
    }
}

/// Writes a value to a file, replacing whatever was there
pub fn save<T, P>(value: &T, path: P) -> Result<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    Codec::default().save(value, path)
}

/// Writes a value to a file that must not exist yet
pub fn save_new<T, P>(value: &T, path: P) -> Result<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    Codec::default().save_new(value, path)
}

/// Reads a value back from a file
pub fn load<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    Codec::default().load(path)
}

/// Writes an untyped value to a file
pub fn save_pickle<P: AsRef<Path>>(value: &Value, path: P) -> Result<()> {
    save(value, path)
}

/// Reads an untyped value back from a file
pub fn load_pickle<P: AsRef<Path>>(path: P) -> Result<Value> {
    load(path)
}
