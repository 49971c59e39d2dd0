// --- File: crates/clinic_booking/src/load_state.rs ---
use clinic_common::{internal_error, ClinicError};

/// Progress of a list view's data. Views move to `Loading` on `reload()` and
/// never retry on their own.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn from_result(result: Result<T, ClinicError>) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(err) => LoadState::Failed(err.user_message()),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// The loaded value, or the failure as an error.
    pub fn loaded(&self) -> Result<&T, ClinicError> {
        match self {
            LoadState::Loaded(value) => Ok(value),
            LoadState::Failed(message) => Err(ClinicError::LoadError(message.clone())),
            LoadState::Idle | LoadState::Loading => Err(internal_error("data not loaded yet")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_common::validation_error;

    #[test]
    fn test_from_result() {
        let loaded: LoadState<u8> = LoadState::from_result(Ok(3));
        assert_eq!(loaded.value(), Some(&3));
        assert_eq!(loaded.error(), None);

        let failed: LoadState<u8> =
            LoadState::from_result(Err(validation_error("Error al cargar citas")));
        assert_eq!(failed.error(), Some("Error al cargar citas"));
        assert!(!failed.is_loading());
        assert_eq!(LoadState::<u8>::default(), LoadState::Idle);
    }

    #[test]
    fn test_loaded_surfaces_failure() {
        let failed: LoadState<u8> = LoadState::Failed("Error al cargar citas".to_string());
        let err = failed.loaded().unwrap_err();
        assert_eq!(err.user_message(), "Error al cargar citas");
        assert!(LoadState::<u8>::Loading.loaded().is_err());
        assert_eq!(LoadState::Loaded(4u8).loaded().unwrap(), &4);
    }
}
