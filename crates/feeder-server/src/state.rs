use application::RegistrationService;

/// Shared handle every request handler receives.
///
/// The registration service already owns its repository and relay handles,
/// so the state is just the service plus nothing else.
pub struct AppState {
    pub service: RegistrationService,
}

impl AppState {
    pub fn new(service: RegistrationService) -> Self {
        Self { service }
    }
}
