use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::info;
use photoatomic_data::{PhotonLibraryRecord, VersionRecord};

use crate::element::PhotonInteraction;
use crate::error::{PhotonError, Result};
use crate::grids::SharedGrids;
use crate::micro_xs::MicroXsCache;
use crate::settings::PhotonSettings;

/// Registry of photon interaction data for a set of elements.
///
/// Built once before transport starts and shared read-only between worker
/// threads afterwards.
#[derive(Debug)]
pub struct PhotonLibrary {
    version: Vec<VersionRecord>,
    grids: Arc<SharedGrids>,
    elements: Vec<PhotonInteraction>,
    symbol_to_index: HashMap<String, usize>,
    name_to_index: HashMap<String, usize>,
    z_to_index: HashMap<u32, usize>,
    settings: PhotonSettings,
}

impl PhotonLibrary {
    /// Build every element of a decoded library record.
    pub fn from_record(record: &PhotonLibraryRecord, settings: PhotonSettings) -> Result<Self> {
        settings.validate()?;
        let grids = Arc::new(SharedGrids::from_record(&record.shared)?);

        let mut elements = Vec::with_capacity(record.elements.len());
        let mut symbol_to_index = HashMap::new();
        let mut name_to_index = HashMap::new();
        let mut z_to_index = HashMap::new();
        for elem in &record.elements {
            let element = PhotonInteraction::from_record(elem, Arc::clone(&grids), &settings)?;
            let index = elements.len();
            if z_to_index.insert(element.z(), index).is_some() {
                return Err(PhotonError::DataError(format!(
                    "element Z = {} appears twice in the library",
                    element.z()
                )));
            }
            symbol_to_index.insert(element.name().to_string(), index);
            symbol_to_index.insert(element.name().to_lowercase(), index);
            if !element.long_name().is_empty() {
                name_to_index.insert(element.long_name().to_string(), index);
            }
            elements.push(element);
        }

        info!(
            "photon library loaded: {} elements, {} version entries",
            elements.len(),
            record.version.len()
        );

        Ok(PhotonLibrary {
            version: record.version.clone(),
            grids,
            elements,
            symbol_to_index,
            name_to_index,
            z_to_index,
            settings,
        })
    }

    /// Decode a zstd-compressed postcard library.
    pub fn from_compressed(bytes: &[u8], settings: PhotonSettings) -> Result<Self> {
        let mut decoder = ruzstd::decoding::StreamingDecoder::new(bytes)
            .map_err(|e| PhotonError::DataError(format!("failed to create zstd decoder: {e}")))?;
        let mut decompressed = Vec::new();
        std::io::Read::read_to_end(&mut decoder, &mut decompressed)?;

        let record: PhotonLibraryRecord = postcard::from_bytes(&decompressed)
            .map_err(|e| PhotonError::DataError(format!("failed to deserialize library: {e}")))?;
        Self::from_record(&record, settings)
    }

    /// Read and decode a compressed library file.
    pub fn open(path: impl AsRef<Path>, settings: PhotonSettings) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        info!("reading photon library from {}", path.display());
        Self::from_compressed(&bytes, settings)
    }

    pub fn version(&self) -> &[VersionRecord] {
        &self.version
    }

    pub fn grids(&self) -> &Arc<SharedGrids> {
        &self.grids
    }

    pub fn settings(&self) -> &PhotonSettings {
        &self.settings
    }

    pub fn elements(&self) -> &[PhotonInteraction] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Resolve an element identifier (symbol, name, or atomic number) to its
    /// index in [`PhotonLibrary::elements`].
    pub fn resolve_element(&self, element: &str) -> Result<usize> {
        // Try as atomic number first
        if let Ok(z) = element.parse::<u32>() {
            if let Some(&index) = self.z_to_index.get(&z) {
                return Ok(index);
            }
        }
        if let Some(&index) = self.symbol_to_index.get(element) {
            return Ok(index);
        }
        let lower = element.to_lowercase();
        if let Some(&index) = self
            .symbol_to_index
            .get(&lower)
            .or_else(|| self.name_to_index.get(&lower))
        {
            return Ok(index);
        }
        Err(PhotonError::UnknownElement(element.to_string()))
    }

    pub fn element(&self, element: &str) -> Result<&PhotonInteraction> {
        Ok(&self.elements[self.resolve_element(element)?])
    }

    pub fn by_z(&self, z: u32) -> Result<&PhotonInteraction> {
        self.z_to_index
            .get(&z)
            .map(|&i| &self.elements[i])
            .ok_or_else(|| PhotonError::UnknownElement(z.to_string()))
    }

    /// Fresh per-thread cross-section cache sized for this library.
    pub fn new_cache(&self) -> MicroXsCache {
        MicroXsCache::new(self.elements.len())
    }
}
