use ei_core::validate::{Field, ValidationErrors, validate_login, validate_register};
use ei_core::{LoginRequest, RegisterRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

pub enum AuthAction {
    Login(LoginRequest),
    Register(RegisterRequest),
}

#[derive(Default)]
pub struct AuthView {
    mode: AuthMode,
    name: String,
    email: String,
    password: String,
    errors: ValidationErrors,
    server_error: Option<String>,
    submitting: bool,
}

impl AuthView {
    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    pub fn set_server_error(&mut self, message: String) {
        self.server_error = Some(message);
        self.submitting = false;
    }

    /// Forget the form after a successful sign-in.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<AuthAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading("EnergyInsight");
            ui.label(match self.mode {
                AuthMode::Login => "Sign in to your account",
                AuthMode::Register => "Create a new account",
            });
            ui.add_space(16.0);

            ui.allocate_ui(egui::vec2(320.0, 0.0), |ui| {
                if self.mode == AuthMode::Register {
                    field(ui, "Name", &mut self.name, false, self.errors.get(Field::Name));
                }
                field(ui, "Email", &mut self.email, false, self.errors.get(Field::Email));
                field(
                    ui,
                    "Password",
                    &mut self.password,
                    true,
                    self.errors.get(Field::Password),
                );

                if let Some(message) = &self.server_error {
                    ui.colored_label(egui::Color32::RED, message);
                }

                ui.add_space(8.0);
                let label = match self.mode {
                    AuthMode::Login => "Sign in",
                    AuthMode::Register => "Create account",
                };
                let submit = ui.add_enabled(!self.submitting, egui::Button::new(label));
                if self.submitting {
                    ui.spinner();
                }
                if submit.clicked() {
                    action = self.submit();
                }

                ui.add_space(8.0);
                let switch = match self.mode {
                    AuthMode::Login => "Don't have an account? Register",
                    AuthMode::Register => "Already have an account? Sign in",
                };
                if ui.link(switch).clicked() {
                    self.mode = match self.mode {
                        AuthMode::Login => AuthMode::Register,
                        AuthMode::Register => AuthMode::Login,
                    };
                    self.errors = ValidationErrors::default();
                    self.server_error = None;
                }
            });
        });

        action
    }

    fn submit(&mut self) -> Option<AuthAction> {
        self.server_error = None;
        let action = match self.mode {
            AuthMode::Login => {
                let request = LoginRequest {
                    email: self.email.trim().to_string(),
                    password: self.password.clone(),
                };
                self.errors = validate_login(&request);
                AuthAction::Login(request)
            }
            AuthMode::Register => {
                let request = RegisterRequest {
                    name: self.name.trim().to_string(),
                    email: self.email.trim().to_string(),
                    password: self.password.clone(),
                };
                self.errors = validate_register(&request);
                AuthAction::Register(request)
            }
        };
        if !self.errors.is_empty() {
            return None;
        }
        self.submitting = true;
        Some(action)
    }
}

fn field(ui: &mut egui::Ui, label: &str, value: &mut String, password: bool, error: Option<&str>) {
    ui.label(label);
    ui.add(
        egui::TextEdit::singleline(value)
            .password(password)
            .desired_width(f32::INFINITY),
    );
    if let Some(error) = error {
        ui.colored_label(egui::Color32::RED, error);
    }
    ui.add_space(4.0);
}
