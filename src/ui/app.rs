//! Main application UI.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout, RichText};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use validator::ValidateEmail;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::export::{self, ExportFormat, ExportTable};
use crate::filter::{self, SearchFilter};
use crate::form::{FieldErrors, FormController, FormData, FormEntity, FormMode, SettingsTab, Submission};
use crate::loader::{DataSource, Generation, LoadState, LoadTracker};
use crate::models::{
    ChartData, Comment, CommentStatus, DashboardStats, Destination, Package, Payment, PaymentStatus, Provider,
    Record, RecordId, Reservation, ReservationStatus, Role, StatusLabel, Tourist, User,
};
use crate::pages::Page;
use crate::permissions::PermissionMatrix;
use crate::seed;
use crate::session::{Session, SessionManager, SessionUser};
use crate::stats;
use crate::store::{Batch, Dataset, Store, Stored};

use super::components::colors;
use super::{dashboard, detail, entity_panel, login_panel, settings_panel};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    Login,
    #[default]
    Dashboard,
    Users,
    Tourists,
    Destinations,
    Packages,
    Reservations,
    Payments,
    Providers,
    Comments,
    Roles,
    Settings,
}

impl Panel {
    /// Panels reachable from the navigation menu.
    pub const NAV: [Panel; 11] = [
        Self::Dashboard,
        Self::Users,
        Self::Tourists,
        Self::Destinations,
        Self::Packages,
        Self::Reservations,
        Self::Payments,
        Self::Providers,
        Self::Comments,
        Self::Roles,
        Self::Settings,
    ];

    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Login => "Sign In",
            Panel::Dashboard => "Dashboard",
            Panel::Users => "Users",
            Panel::Tourists => "Tourists",
            Panel::Destinations => "Destinations",
            Panel::Packages => "Packages",
            Panel::Reservations => "Reservations",
            Panel::Payments => "Payments",
            Panel::Providers => "Providers",
            Panel::Comments => "Comments",
            Panel::Roles => "Roles",
            Panel::Settings => "Settings",
        }
    }

    pub fn icon(&self) -> &'static str {
        use egui_phosphor::regular as icons;
        match self {
            Panel::Login => icons::SIGN_IN,
            Panel::Dashboard => icons::HOUSE,
            Panel::Users => icons::USERS,
            Panel::Tourists => icons::USER,
            Panel::Destinations => icons::MAP_PIN,
            Panel::Packages => icons::PACKAGE,
            Panel::Reservations => icons::CALENDAR_CHECK,
            Panel::Payments => icons::CREDIT_CARD,
            Panel::Providers => icons::HANDSHAKE,
            Panel::Comments => icons::CHAT_CIRCLE_TEXT,
            Panel::Roles => icons::SHIELD_CHECK,
            Panel::Settings => icons::GEAR,
        }
    }

    /// Collections the panel reads, its own first.
    pub fn datasets(&self) -> Vec<Dataset> {
        fn page<T: Page>() -> Vec<Dataset> {
            let mut datasets = vec![T::COLLECTION];
            datasets.extend_from_slice(T::DEPENDS_ON);
            datasets
        }

        match self {
            Panel::Login | Panel::Settings => Vec::new(),
            Panel::Dashboard => vec![Dataset::Users, Dataset::Tourists, Dataset::Reservations, Dataset::Payments],
            Panel::Users => page::<User>(),
            Panel::Tourists => page::<Tourist>(),
            Panel::Destinations => page::<Destination>(),
            Panel::Packages => page::<Package>(),
            Panel::Reservations => page::<Reservation>(),
            Panel::Payments => page::<Payment>(),
            Panel::Providers => page::<Provider>(),
            Panel::Comments => page::<Comment>(),
            Panel::Roles => page::<Role>(),
        }
    }
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Data loading
    Loaded(Generation, Batch),
    LoadFailed(Dataset, Generation, AppError),
    DashboardLoaded(DashboardStats, ChartData),

    // CRUD operations
    Saved {
        batch: Batch,
        message: String,
        close_form: bool,
    },
    Deleted {
        dataset: Dataset,
        id: RecordId,
        label: String,
    },
    OperationFailed(AppError),

    // Session
    LoggedIn(Session),
    LoginFailed(String),
    LoggedOut,
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Target for delete confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub dataset: Dataset,
    pub id: RecordId,
    pub label: String,
}

/// Record shown in the detail window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTarget {
    pub dataset: Dataset,
    pub id: RecordId,
}

/// Sign-in form state.
#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub pending: bool,
}

/// Create/edit dialogs, one per editable record type.
#[derive(Default)]
pub struct Forms {
    pub users: FormController<User>,
    pub tourists: FormController<Tourist>,
    pub destinations: FormController<Destination>,
    pub packages: FormController<Package>,
    pub reservations: FormController<Reservation>,
    pub providers: FormController<Provider>,
    pub roles: FormController<Role>,
    /// Permission selection of the role being edited.
    pub role_permissions: PermissionMatrix,
}

impl Forms {
    fn close(&mut self, dataset: Dataset) {
        match dataset {
            Dataset::Users => self.users.cancel(),
            Dataset::Tourists => self.tourists.cancel(),
            Dataset::Destinations => self.destinations.cancel(),
            Dataset::Packages => self.packages.cancel(),
            Dataset::Reservations => self.reservations.cancel(),
            Dataset::Providers => self.providers.cancel(),
            Dataset::Roles => self.roles.cancel(),
            _ => {}
        }
    }
}

/// Records that can be sent to the server.
pub trait Syncable: Stored + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Syncable for T where T: Stored + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Records with a create/edit dialog.
pub trait Editable: FormEntity + Page + Syncable {
    fn controller(forms: &mut Forms) -> &mut FormController<Self>;

    /// Fill in parts of the record edited outside the schema fields.
    fn complete(&mut self, _forms: &Forms) {}
}

macro_rules! editable {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl Editable for $ty {
                fn controller(forms: &mut Forms) -> &mut FormController<Self> {
                    &mut forms.$field
                }
            }
        )*
    };
}

editable! {
    User => users,
    Tourist => tourists,
    Destination => destinations,
    Package => packages,
    Reservation => reservations,
    Provider => providers,
}

impl Editable for Role {
    fn controller(forms: &mut Forms) -> &mut FormController<Self> {
        &mut forms.roles
    }

    fn complete(&mut self, forms: &Forms) {
        // Without a catalog the matrix cannot represent the selection.
        if forms.role_permissions.catalog().is_empty() {
            return;
        }
        self.permissions = forms.role_permissions.materialize();
    }
}

/// Main application state.
pub struct App {
    // Runtime and data source
    pub rt: tokio::runtime::Runtime,
    pub source: DataSource,
    pub session: SessionManager,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    pub current_panel: Panel,

    // Cached data
    pub store: Store,
    pub loads: LoadTracker,
    pub remote_stats: Option<DashboardStats>,
    pub charts: Option<ChartData>,
    pub pending_operations: usize,

    // Search/filter state
    pub searches: HashMap<Dataset, SearchFilter>,

    // Forms
    pub forms: Forms,
    pub login: LoginForm,
    pub settings_tab: SettingsTab,
    pub settings_form: FormData,
    pub settings_errors: FieldErrors,
    pub reply_input: String,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Configuration
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub config_modified: bool,

    // Dialogs
    pub detail: Option<DetailTarget>,
    pub show_delete_confirm: bool,
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl App {
    pub fn new(config: AppConfig, config_path: PathBuf, rt: tokio::runtime::Runtime) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = SessionManager::new();
        let source = DataSource::from_config(&config, session.clone())?;
        let settings_tab = SettingsTab::default();

        let mut app = Self {
            rt,
            source,
            session,
            tx,
            rx,
            current_panel: Panel::default(),
            store: Store::new(),
            loads: LoadTracker::new(),
            remote_stats: None,
            charts: None,
            pending_operations: 0,
            searches: HashMap::new(),
            forms: Forms::default(),
            login: LoginForm::default(),
            settings_tab,
            settings_form: FormData::default(),
            settings_errors: FieldErrors::new(),
            reply_input: String::new(),
            log_messages: Vec::new(),
            config,
            config_path,
            config_modified: false,
            detail: None,
            show_delete_confirm: false,
            delete_target: None,
            error_message: None,
            success_message: None,
        };
        app.settings_form = settings_tab.to_form(&app.store.settings);

        // Load initial data
        let start = if app.requires_login() {
            Panel::Login
        } else {
            Panel::Dashboard
        };
        app.navigate(start);

        Ok(app)
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    /// Log an info message.
    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Log a success message.
    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Log a warning message.
    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Log an error message.
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Clear the activity log.
    pub fn clear_log(&mut self) {
        self.log_messages.clear();
    }

    fn notify_success(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.log_success(message.clone());
        self.success_message = Some(message);
    }

    /// Show an error, or send the user back to sign in when the session is gone.
    pub fn report_error(&mut self, err: AppError) {
        if matches!(err, AppError::Unauthorized) {
            warn!("Session rejected by server");
            self.log_warning("Session expired, please sign in again");
            self.session.invalidate();
            self.loads.reset();
            self.login.error = Some(err.to_string());
            self.navigate(Panel::Login);
            return;
        }
        error!("{err}");
        self.log_error(err.to_string());
        self.error_message = Some(err.to_string());
    }

    pub fn is_remote(&self) -> bool {
        self.source.is_remote()
    }

    fn requires_login(&self) -> bool {
        self.source.is_remote() && !self.session.is_active()
    }

    /// Switch panels, aborting loads the new panel does not need.
    pub fn navigate(&mut self, panel: Panel) {
        let panel = if panel != Panel::Login && self.requires_login() {
            Panel::Login
        } else {
            panel
        };

        let needed = panel.datasets();
        for dataset in self.loads.cancel_except(&needed) {
            self.log_warning(format!("Stopped loading {}", dataset.name()));
        }

        if panel != self.current_panel {
            debug!("Navigating to {}", panel.name());
            self.forms = Forms::default();
            self.detail = None;
        }
        self.current_panel = panel;

        for dataset in needed {
            if matches!(self.loads.state(dataset), LoadState::Idle) {
                self.load(dataset);
            }
        }
        if panel == Panel::Dashboard {
            self.load_dashboard();
        }
        if panel == Panel::Settings {
            self.settings_form = self.settings_tab.to_form(&self.store.settings);
            self.settings_errors.clear();
        }
    }

    /// Start loading a collection unless a load is already running.
    pub fn load(&mut self, dataset: Dataset) {
        let Some(generation) = self.loads.begin(dataset) else {
            return;
        };
        self.log_info(format!("Loading {}...", dataset.name()));

        let source = self.source.clone();
        let tx = self.tx.clone();

        let handle = self.rt.spawn(async move {
            match source.load(dataset).await {
                Ok(batch) => {
                    let _ = tx.send(UiMessage::Loaded(generation, batch));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadFailed(dataset, generation, e));
                }
            }
        });
        self.loads.attach(dataset, handle.abort_handle());
    }

    /// Reload every collection the current panel reads.
    pub fn refresh(&mut self) {
        for dataset in self.current_panel.datasets() {
            self.load(dataset);
        }
        if self.current_panel == Panel::Dashboard {
            self.load_dashboard();
        }
    }

    /// Dashboard figures come from the server in remote mode.
    fn load_dashboard(&mut self) {
        let Some(client) = self.source.client().cloned() else {
            self.charts = Some(seed::charts());
            return;
        };
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match tokio::try_join!(client.dashboard_stats(), client.dashboard_charts()) {
                Ok((stats, charts)) => {
                    let _ = tx.send(UiMessage::DashboardLoaded(stats, charts));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Figures for the dashboard cards.
    pub fn dashboard_stats(&self) -> DashboardStats {
        self.remote_stats.unwrap_or_else(|| stats::dashboard(&self.store))
    }

    pub fn search(&self, dataset: Dataset) -> SearchFilter {
        self.searches.get(&dataset).cloned().unwrap_or_default()
    }

    pub fn search_mut(&mut self, dataset: Dataset) -> &mut SearchFilter {
        self.searches.entry(dataset).or_default()
    }

    /// Records of a page after its search and filters.
    pub fn visible<T: Page>(&self) -> Vec<&T> {
        match self.searches.get(&T::COLLECTION) {
            Some(search) => filter::apply(self.store.all::<T>(), search, &self.store),
            None => self.store.all::<T>().iter().collect(),
        }
    }

    pub fn open_create<T: Editable>(&mut self) {
        T::controller(&mut self.forms).open_create();
        if T::COLLECTION == Dataset::Roles {
            self.reset_role_permissions(None);
        }
    }

    pub fn open_edit<T: Editable>(&mut self, id: RecordId) {
        let Some(record) = self.store.get::<T>(id).cloned() else {
            self.report_error(AppError::not_found(format!("{} {id}", T::NOUN)));
            return;
        };
        T::controller(&mut self.forms).open_edit(&record);
        if T::COLLECTION == Dataset::Roles {
            self.reset_role_permissions(Some(id));
        }
    }

    fn reset_role_permissions(&mut self, role: Option<RecordId>) {
        self.forms.role_permissions = PermissionMatrix::new(self.store.permissions.clone());
        if let Some(role) = role.and_then(|id| self.store.get::<Role>(id)) {
            self.forms.role_permissions.load_selection(&role.permissions);
        }
    }

    /// Validate the open form and create or update its record.
    ///
    /// Invalid input leaves the dialog open with per-field messages.
    pub fn save_form<T: Editable>(&mut self) {
        let today = Local::now().date_naive();
        let mut record = match T::controller(&mut self.forms).draft(&self.store, today) {
            Ok(record) => record,
            Err(AppError::Validation(msg)) => {
                debug!("{} not saved: {msg}", T::NOUN);
                return;
            }
            Err(e) => {
                self.report_error(e);
                return;
            }
        };
        record.complete(&self.forms);

        let creating = T::controller(&mut self.forms).mode() == FormMode::Creating;
        let label = format!("{} '{}'", T::NOUN, record.label());

        let Some(client) = self.source.client().cloned() else {
            let verb = match T::controller(&mut self.forms).commit(&mut self.store, record) {
                Submission::Created(_) => "created",
                Submission::Updated(_) => "updated",
            };
            self.notify_success(format!("{label} {verb}"));
            return;
        };

        self.log_info(format!("Saving {label}..."));
        self.pending_operations += 1;
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let result = if creating {
                client.create(&record).await
            } else {
                client.update(&record).await
            };
            match result {
                Ok(saved) => {
                    let verb = if creating { "created" } else { "updated" };
                    let _ = tx.send(UiMessage::Saved {
                        batch: T::batch(vec![saved]),
                        message: format!("{label} {verb}"),
                        close_form: true,
                    });
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Apply a change to one record, in the store or through `PUT` on the server.
    fn modify<T: Syncable>(
        &mut self,
        id: RecordId,
        message: String,
        change: impl FnOnce(&mut Store) -> Result<()>,
    ) {
        let Some(client) = self.source.client().cloned() else {
            match change(&mut self.store) {
                Ok(()) => self.notify_success(message),
                Err(e) => self.report_error(e),
            }
            return;
        };

        let Some(current) = self.store.get::<T>(id).cloned() else {
            self.report_error(AppError::not_found(format!("{} {id}", T::DATASET)));
            return;
        };
        let mut scratch = Store::new();
        scratch.insert(current);
        if let Err(e) = change(&mut scratch) {
            self.report_error(e);
            return;
        }
        let Some(updated) = scratch.get::<T>(id).cloned() else {
            return;
        };

        self.pending_operations += 1;
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.update(&updated).await {
                Ok(saved) => {
                    let _ = tx.send(UiMessage::Saved {
                        batch: T::batch(vec![saved]),
                        message,
                        close_form: false,
                    });
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    fn record_label<T: Stored>(&self, id: RecordId) -> String {
        self.store
            .get::<T>(id)
            .map(|r| r.label())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn set_reservation_status(&mut self, id: RecordId, status: ReservationStatus) {
        let message = format!("Reservation {} marked {}", self.record_label::<Reservation>(id), status.label());
        self.modify::<Reservation>(id, message, move |store| store.set_reservation_status(id, status));
    }

    pub fn set_payment_status(&mut self, id: RecordId, status: PaymentStatus) {
        let message = format!("Payment {} marked {}", self.record_label::<Payment>(id), status.label());
        self.modify::<Payment>(id, message, move |store| store.set_payment_status(id, status));
    }

    pub fn set_comment_status(&mut self, id: RecordId, status: CommentStatus) {
        let message = format!("Comment {} {}", self.record_label::<Comment>(id), status.label().to_lowercase());
        self.modify::<Comment>(id, message, move |store| store.set_comment_status(id, status));
    }

    pub fn reply_to_comment(&mut self, id: RecordId) {
        let reply = std::mem::take(&mut self.reply_input);
        let message = format!("Reply saved on comment {}", self.record_label::<Comment>(id));
        self.modify::<Comment>(id, message, move |store| store.reply_to_comment(id, &reply));
    }

    pub fn open_detail(&mut self, dataset: Dataset, id: RecordId) {
        self.reply_input = self
            .store
            .get::<Comment>(id)
            .filter(|_| dataset == Dataset::Comments)
            .map(|c| c.admin_reply.clone())
            .unwrap_or_default();
        self.detail = Some(DetailTarget { dataset, id });
    }

    /// Ask for confirmation before deleting a record.
    pub fn request_delete<T: Page>(&mut self, id: RecordId) {
        let label = self.record_label::<T>(id);
        self.delete_target = Some(DeleteTarget {
            dataset: T::COLLECTION,
            id,
            label,
        });
        self.show_delete_confirm = true;
    }

    /// Execute the confirmed delete operation.
    fn confirm_delete(&mut self) {
        let Some(target) = self.delete_target.take() else {
            return;
        };
        self.log_info(format!("Deleting {}: {}", target.dataset.name(), target.label));

        let Some(client) = self.source.client().cloned() else {
            if self.store.delete_in(target.dataset, target.id) {
                self.after_delete(target.dataset, target.id, &target.label);
            } else {
                self.report_error(AppError::not_found(target.label));
            }
            return;
        };

        self.pending_operations += 1;
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.delete_in(target.dataset, target.id).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::Deleted {
                        dataset: target.dataset,
                        id: target.id,
                        label: target.label,
                    });
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    fn after_delete(&mut self, dataset: Dataset, id: RecordId, label: &str) {
        if self.detail == Some(DetailTarget { dataset, id }) {
            self.detail = None;
        }
        self.notify_success(format!("Deleted '{label}'"));
    }

    /// Export the filtered rows of a page.
    pub fn export_page<T: Page>(&mut self, format: ExportFormat) {
        let table = {
            let rows = self.visible::<T>();
            ExportTable::build(&rows, T::EXPORT, &self.store)
        };
        let filename = export::generate_export_filename(T::DATASET, format);

        let Some(path) = export::show_save_dialog(&filename, format, &self.config.export.output_dir) else {
            self.log_info("Export cancelled");
            return;
        };

        let result = match format {
            ExportFormat::Excel => export::export_to_excel(&table, &path),
            ExportFormat::Pdf => export::export_to_pdf(&table, &path, Local::now().date_naive()),
        };
        match result {
            Ok(()) => {
                self.notify_success(format!("Exported {} rows to: {}", table.rows.len(), path.display()));
            }
            Err(e) => {
                self.error_message = Some(format!("Export failed: {}", e));
                self.log_error(format!("Export failed: {}", e));
            }
        }
    }

    pub fn switch_settings_tab(&mut self, tab: SettingsTab) {
        self.settings_tab = tab;
        self.settings_form = tab.to_form(&self.store.settings);
        self.settings_errors.clear();
    }

    pub fn save_settings(&mut self) {
        match self.settings_tab.save(&mut self.store.settings, &self.settings_form) {
            Ok(()) => {
                self.settings_errors.clear();
                self.notify_success(format!("{} settings saved", self.settings_tab.label()));
            }
            Err(errors) => {
                debug!("{} settings have {} invalid fields", self.settings_tab.label(), errors.len());
                self.settings_errors = errors;
            }
        }
    }

    /// Write the application configuration file.
    pub fn save_config(&mut self) {
        if let Err(e) = self.config.validate() {
            self.error_message = Some(e.to_string());
            return;
        }
        match self.config.save(&self.config_path) {
            Ok(()) => {
                self.config_modified = false;
                self.notify_success(format!("Configuration saved to {}", self.config_path.display()));
            }
            Err(e) => {
                error!("Failed to save config: {}", e);
                self.error_message = Some(format!("Failed to save config: {}", e));
            }
        }
    }

    pub fn sign_in(&mut self) {
        let email = self.login.email.trim().to_string();
        if !email.as_str().validate_email() {
            self.login.error = Some("Enter a valid email address".to_string());
            return;
        }
        if self.login.password.is_empty() {
            self.login.error = Some("Enter your password".to_string());
            return;
        }
        self.login.error = None;
        let password = std::mem::take(&mut self.login.password);

        let Some(client) = self.source.client().cloned() else {
            let name = email.split('@').next().unwrap_or_default().to_string();
            let session = Session {
                token: "local".to_string(),
                user: SessionUser {
                    id: 1,
                    name,
                    email,
                    role: "Admin".to_string(),
                },
                expires_at: None,
            };
            match self.session.start(session.clone()) {
                Ok(()) => self.after_login(session),
                Err(e) => self.report_error(e),
            }
            return;
        };

        self.login.pending = true;
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.login(&email, &password).await {
                Ok(session) => {
                    let _ = tx.send(UiMessage::LoggedIn(session));
                }
                Err(AppError::Unauthorized) => {
                    let _ = tx.send(UiMessage::LoginFailed("Invalid email or password".to_string()));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoginFailed(e.to_string()));
                }
            }
        });
    }

    fn after_login(&mut self, session: Session) {
        self.login = LoginForm::default();
        self.log_success(format!("Signed in as {}", session.user.email));
        self.navigate(Panel::Dashboard);
    }

    pub fn sign_out(&mut self) {
        let Some(client) = self.source.client().cloned() else {
            self.session.invalidate();
            self.after_logout();
            return;
        };
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            if let Err(e) = client.logout().await {
                warn!("Logout request failed: {}", e);
            }
            let _ = tx.send(UiMessage::LoggedOut);
        });
    }

    fn after_logout(&mut self) {
        self.loads.reset();
        self.store = Store::new();
        self.remote_stats = None;
        self.log_info("Signed out");
        self.navigate(Panel::Login);
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::Loaded(generation, batch) => {
                    let dataset = batch.dataset();
                    if self.loads.finish(dataset, generation, Ok(())) {
                        self.log_info(format!("Loaded {} {}", batch.len(), dataset.name()));
                        self.store.apply(batch);
                    }
                }
                UiMessage::LoadFailed(dataset, generation, e) => {
                    if self.loads.finish(dataset, generation, Err(e.to_string())) {
                        if matches!(e, AppError::Unauthorized) {
                            self.report_error(e);
                        } else {
                            error!("Failed to load {}: {}", dataset.name(), e);
                            self.log_error(format!("Failed to load {}: {}", dataset.name(), e));
                        }
                    }
                }
                UiMessage::DashboardLoaded(stats, charts) => {
                    self.remote_stats = Some(stats);
                    self.charts = Some(charts);
                }
                UiMessage::Saved {
                    batch,
                    message,
                    close_form,
                } => {
                    self.pending_operations = self.pending_operations.saturating_sub(1);
                    let dataset = batch.dataset();
                    self.store.merge(batch);
                    if close_form {
                        self.forms.close(dataset);
                    }
                    self.notify_success(message);
                }
                UiMessage::Deleted { dataset, id, label } => {
                    self.pending_operations = self.pending_operations.saturating_sub(1);
                    self.store.delete_in(dataset, id);
                    self.after_delete(dataset, id, &label);
                }
                UiMessage::OperationFailed(e) => {
                    self.pending_operations = self.pending_operations.saturating_sub(1);
                    self.report_error(e);
                }
                UiMessage::LoggedIn(session) => self.after_login(session),
                UiMessage::LoginFailed(message) => {
                    warn!("Sign in failed: {}", message);
                    self.login.pending = false;
                    self.login.error = Some(message);
                }
                UiMessage::LoggedOut => self.after_logout(),
            }
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.add_enabled_ui(self.current_panel != Panel::Login, |ui| {
                    ui.menu_button("Go", |ui| {
                        for panel in Panel::NAV {
                            if ui.button(format!("{} {}", panel.icon(), panel.name())).clicked() {
                                self.navigate(panel);
                                ui.close();
                            }
                        }
                    });
                    ui.menu_button("Data", |ui| {
                        if ui.button("Refresh").clicked() {
                            self.refresh();
                            ui.close();
                        }
                        if ui.button("Clear Activity Log").clicked() {
                            self.clear_log();
                            ui.close();
                        }
                    });
                });

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if let Some(session) = self.session.current() {
                        if ui.button(format!("{} Sign Out", egui_phosphor::regular::SIGN_OUT)).clicked() {
                            self.sign_out();
                        }
                        ui.label(RichText::new(format!("{} ({})", session.user.name, session.user.role)).weak());
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    let (color, text) = if self.is_remote() {
                        (colors::INFO, format!("API: {}", self.config.api.base_url))
                    } else {
                        (colors::NEUTRAL, "Sample data".to_string())
                    };
                    ui.colored_label(color, text);

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.loads.any_loading() || self.pending_operations > 0 {
                            ui.label("Working...");
                            ui.spinner();
                        }
                    });
                });
            });
    }

    /// Render modal dialogs (error, success, delete confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Error dialog
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Delete confirmation dialog
        if !self.show_delete_confirm {
            return;
        }
        let Some(target) = self.delete_target.clone() else {
            return;
        };
        egui::Window::new("Confirm Delete")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Delete '{}'? This cannot be undone.", target.label));
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.show_delete_confirm = false;
                        self.delete_target = None;
                    }
                    if ui.button(RichText::new("Delete").color(colors::ERROR)).clicked() {
                        self.confirm_delete();
                        self.show_delete_confirm = false;
                        self.delete_target = None;
                    }
                });
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Request repaint during async operations
        if self.loads.any_loading() || self.pending_operations > 0 || self.login.pending {
            ctx.request_repaint();
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);

        // Modal dialogs (error, success, delete confirmation)
        self.show_dialogs(ctx);
        detail::show(self, ctx);

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| {
            let back = match self.current_panel {
                Panel::Login => {
                    login_panel::show(self, ui);
                    false
                }
                Panel::Dashboard => {
                    if let Some(next) = dashboard::show(self, ui) {
                        self.navigate(next);
                    }
                    false
                }
                Panel::Users => entity_panel::show_editable::<User>(self, ui),
                Panel::Tourists => entity_panel::show_editable::<Tourist>(self, ui),
                Panel::Destinations => entity_panel::show_editable::<Destination>(self, ui),
                Panel::Packages => entity_panel::show_editable::<Package>(self, ui),
                Panel::Reservations => entity_panel::show_editable::<Reservation>(self, ui),
                Panel::Payments => entity_panel::show_readonly::<Payment>(self, ui),
                Panel::Providers => entity_panel::show_editable::<Provider>(self, ui),
                Panel::Comments => entity_panel::show_readonly::<Comment>(self, ui),
                Panel::Roles => entity_panel::show_editable::<Role>(self, ui),
                Panel::Settings => settings_panel::show(self, ui),
            };
            if back {
                self.navigate(Panel::Dashboard);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_datasets_start_with_own_collection() {
        assert_eq!(
            Panel::Packages.datasets(),
            vec![Dataset::Packages, Dataset::PackageTypes, Dataset::Destinations, Dataset::Categories]
        );
        assert_eq!(Panel::Roles.datasets(), vec![Dataset::Roles, Dataset::Permissions]);
        assert!(Panel::Login.datasets().is_empty());
    }

    #[test]
    fn test_every_nav_panel_has_name_and_icon() {
        for panel in Panel::NAV {
            assert!(!panel.name().is_empty());
            assert!(!panel.icon().is_empty());
        }
        assert!(!Panel::NAV.contains(&Panel::Login));
    }

    #[test]
    fn test_role_completion_uses_matrix_selection() {
        let store = Store::seeded();
        let mut forms = Forms::default();
        forms.role_permissions = PermissionMatrix::new(store.permissions.clone());
        forms.role_permissions.load_selection(&[RecordId(3), RecordId(1)]);

        let mut role = store.roles[0].clone();
        role.complete(&forms);
        assert_eq!(role.permissions, vec![RecordId(1), RecordId(3)]);
    }

    #[test]
    fn test_role_completion_keeps_ids_without_catalog() {
        let store = Store::seeded();
        let mut forms = Forms::default();
        forms.role_permissions = PermissionMatrix::new(Vec::new());
        forms.role_permissions.load_selection(&store.roles[0].permissions);

        let mut role = store.roles[0].clone();
        assert!(!role.permissions.is_empty());
        role.complete(&forms);
        assert_eq!(role.permissions, store.roles[0].permissions);
    }

    #[test]
    fn test_forms_close_by_dataset() {
        let store = Store::seeded();
        let mut forms = Forms::default();
        forms.providers.open_edit(&store.providers[0]);
        forms.users.open_create();

        forms.close(Dataset::Providers);
        assert!(!forms.providers.is_open());
        assert!(forms.users.is_open());
    }
}
