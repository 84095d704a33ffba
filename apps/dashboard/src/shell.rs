//! Interactive shell
//!
//! Single event loop over three sources: stdin commands, fetch completions
//! coming back from spawned API tasks, and session refresh signals. All view
//! state is owned here, on one task; spawned fetches only ever report back
//! through the channel, so there is exactly one writer per piece of state.

use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::api::{ApiClient, ApiError, FilesPage, LoginPayload, UsersPage};
use crate::config::DashboardConfig;
use crate::guard::RouteGuard;
use crate::models::UserCard;
use crate::router::{History, Route};
use crate::session::SessionStore;
use crate::views::PageRequest;
use crate::views::files::FilesView;
use crate::views::home::HomeView;
use crate::views::login::{LoginView, PendingNavigation, REDIRECT_DELAY};
use crate::views::users::{DetailRequest, UserDetail, UsersView};

/// Completion of a background task, delivered to the event loop
enum Event {
    UsersPage {
        seq: u64,
        result: Result<UsersPage, ApiError>,
    },
    UserDetail {
        seq: u64,
        result: Result<UserDetail, ApiError>,
    },
    FilesPage {
        seq: u64,
        result: Result<FilesPage, ApiError>,
    },
    LoginDone {
        result: Result<LoginPayload, ApiError>,
    },
    DownloadDone {
        file_id: String,
        result: Result<PathBuf, ApiError>,
    },
    Navigate {
        route: Route,
        replace: bool,
    },
}

/// The dashboard application
pub struct Shell {
    config: DashboardConfig,
    session: SessionStore,
    guard: RouteGuard,
    api: ApiClient,
    history: History,
    login: LoginView,
    users: UsersView,
    files: FilesView,
    tx: mpsc::Sender<Event>,
    rx: Option<mpsc::Receiver<Event>>,
}

impl Shell {
    /// Wire up the application; the initial route depends on the stored session
    pub fn new(config: DashboardConfig, session: SessionStore, api: ApiClient) -> Self {
        let guard = RouteGuard::new(session.clone());
        let initial = guard.admit(Route::Home);
        let (tx, rx) = mpsc::channel(32);

        Self {
            users: UsersView::new(config.page_size),
            files: FilesView::new(config.page_size),
            login: LoginView::new(),
            history: History::new(initial),
            config,
            session,
            guard,
            api,
            tx,
            rx: Some(rx),
        }
    }

    /// Run the event loop until quit or EOF
    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut refresh_rx = self.session.subscribe();
        // Taken out of self so the select arms only borrow locals.
        let mut rx = self.rx.take().expect("event receiver already taken");

        self.enter_current();
        self.render();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if !self.handle_command(line.trim()) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                Some(event) = rx.recv() => {
                    self.handle_event(event);
                }
                result = refresh_rx.changed() => {
                    if result.is_ok() {
                        self.reevaluate();
                    }
                }
            }
        }

        info!("Shutting down");
        Ok(())
    }

    /// Apply one command line; returns false to quit
    fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("open") => {
                let path = parts.next().unwrap_or("/");
                match Route::parse(path) {
                    Some(route) => self.navigate(route, false),
                    None => println!("Unknown path: {}", path),
                }
            }
            Some("login") => {
                let email = parts.next().unwrap_or("");
                let password = parts.next().unwrap_or("");
                self.submit_login(email, password);
            }
            Some("logout") => self.logout(),
            Some("next") => {
                let request = match self.history.current() {
                    Route::Users => self.users.next_page(),
                    Route::Files => self.files.next_page(),
                    _ => None,
                };
                self.dispatch_page(request);
            }
            Some("prev") => {
                let request = match self.history.current() {
                    Route::Users => self.users.prev_page(),
                    Route::Files => self.files.prev_page(),
                    _ => None,
                };
                self.dispatch_page(request);
            }
            Some("page") => {
                let target: Option<u32> = parts.next().and_then(|n| n.parse().ok());
                let request = match (self.history.current(), target) {
                    (Route::Users, Some(n)) => self.users.goto(n),
                    (Route::Files, Some(n)) => self.files.goto(n),
                    _ => None,
                };
                self.dispatch_page(request);
            }
            Some("search") => {
                let term = parts.collect::<Vec<_>>().join(" ");
                match self.history.current() {
                    Route::Users => self.users.set_search(&term),
                    Route::Files => self.files.set_search(&term),
                    _ => {}
                }
                self.render();
            }
            Some("view") => {
                if self.history.current() == Route::Users {
                    let request = parts.next().and_then(|id| self.users.view_user(id));
                    self.dispatch_detail(request);
                }
            }
            Some("download") => {
                if self.history.current() == Route::Files {
                    if let Some(request) = parts.next().and_then(|id| self.files.download(id)) {
                        self.dispatch_download(request.file_id);
                    } else {
                        println!("No such file on this page");
                    }
                }
            }
            Some("refresh") => {
                let request = match self.history.current() {
                    Route::Users => self.users.refresh(),
                    Route::Files => self.files.refresh(),
                    _ => None,
                };
                self.dispatch_page(request);
            }
            Some("back") => {
                if self.history.back().is_some() {
                    // The target may have become protected territory since.
                    self.reevaluate();
                    self.enter_current();
                }
                self.render();
            }
            Some("help") => {
                println!(
                    "Commands: open <path> | login <email> <password> | logout | next | prev | \
                     page <n> | search <term> | view <user-id> | download <file-id> | refresh | \
                     back | help | quit"
                );
            }
            Some("quit") | Some("exit") => return false,
            Some(other) => println!("Unknown command: {} (try help)", other),
            None => self.render(),
        }

        true
    }

    /// Apply one background completion
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::UsersPage { seq, result } => {
                if let Err(e) = &result {
                    self.guard.handle_api_error(e);
                }
                self.users.complete(seq, result);
                self.render();
            }
            Event::UserDetail { seq, result } => {
                if let Err(e) = &result {
                    self.guard.handle_api_error(e);
                }
                self.users.complete_detail(seq, result);
                self.render();
            }
            Event::FilesPage { seq, result } => {
                if let Err(e) = &result {
                    self.guard.handle_api_error(e);
                }
                self.files.complete(seq, result);
                self.render();
            }
            Event::LoginDone { result } => {
                if let Some(nav) = self.login.complete(result, &self.session) {
                    self.schedule_navigation(nav);
                }
                self.render();
            }
            Event::DownloadDone { file_id, result } => match result {
                // A failed download is logged, not surfaced as a view error.
                Ok(path) => println!("Downloaded {} to {}", file_id, path.display()),
                Err(e) => error!("Download of {} failed: {}", file_id, e),
            },
            Event::Navigate { route, replace } => self.navigate(route, replace),
        }
    }

    /// Validate and, when clean, dispatch a login submission
    fn submit_login(&mut self, email: &str, password: &str) {
        if self.history.current() != Route::Login {
            self.navigate(Route::Login, false);
        }
        self.login.set_email(email);
        self.login.set_password(password);

        if let Some(request) = self.login.submit() {
            let api = self.api.clone();
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let result = api.login(&request.email, &request.password).await;
                let _ = tx.send(Event::LoginDone { result }).await;
            });
        }
        self.render();
    }

    /// Clear the session and return to the login surface
    fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            error!("Failed to clear session: {}", e);
        }
        self.session.trigger_refresh();
        self.navigate(Route::Login, false);
    }

    /// Navigate through the guard and kick off the page's fetch
    fn navigate(&mut self, route: Route, replace: bool) {
        let admitted = self.guard.admit(route);

        if replace {
            self.history.replace(admitted);
        } else {
            self.history.push(admitted);
        }

        self.enter_current();
        self.render();
    }

    /// Issue the revalidation fetch for the route being entered
    fn enter_current(&mut self) {
        match self.history.current() {
            Route::Users => {
                let request = self.users.open();
                self.dispatch_users(request);
            }
            Route::Files => {
                let request = self.files.open();
                self.dispatch_files(request);
            }
            _ => {}
        }
    }

    /// Re-derive auth state after a refresh signal; redirect if needed
    fn reevaluate(&mut self) {
        let current = self.history.current();
        let admitted = self.guard.admit(current);

        if admitted != current {
            self.history.replace(admitted);
            self.render();
        }
    }

    /// Schedule the post-login redirect after the acknowledgment delay
    fn schedule_navigation(&self, nav: PendingNavigation) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(REDIRECT_DELAY).await;
            let _ = tx
                .send(Event::Navigate {
                    route: nav.route,
                    replace: nav.replace,
                })
                .await;
        });
    }

    fn dispatch_page(&mut self, request: Option<PageRequest>) {
        match (self.history.current(), request) {
            (Route::Users, Some(request)) => self.dispatch_users(request),
            (Route::Files, Some(request)) => self.dispatch_files(request),
            _ => {}
        }
        self.render();
    }

    fn dispatch_users(&self, request: PageRequest) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.users(request.limit, request.page_no).await;
            let _ = tx
                .send(Event::UsersPage {
                    seq: request.seq,
                    result,
                })
                .await;
        });
    }

    fn dispatch_files(&self, request: PageRequest) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.files(request.limit, request.page_no).await;
            let _ = tx
                .send(Event::FilesPage {
                    seq: request.seq,
                    result,
                })
                .await;
        });
    }

    fn dispatch_detail(&mut self, request: Option<DetailRequest>) {
        let Some(request) = request else {
            self.render();
            return;
        };

        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = fetch_detail(&api, &request.user_id).await;
            let _ = tx
                .send(Event::UserDetail {
                    seq: request.seq,
                    result,
                })
                .await;
        });
        self.render();
    }

    fn dispatch_download(&self, file_id: String) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let dir = self.config.downloads_dir.clone();
        tokio::spawn(async move {
            let result = async {
                let info = api.download_url(&file_id).await?;
                api.fetch_to(&info, &dir).await
            }
            .await;
            let _ = tx.send(Event::DownloadDone { file_id, result }).await;
        });
    }

    /// Print the surface for the current route
    fn render(&self) {
        let output = match self.history.current() {
            Route::Home => HomeView::render(&self.session),
            Route::Users => self.users.render(),
            Route::Files => self.files.render(),
            Route::Login => self.login.render(),
            Route::ForgotPassword | Route::Register => {
                "This page is not available yet. Try open /login\n".to_string()
            }
        };

        println!("\n{}", output);
    }
}

/// Fetch the user record and its usage statistics for the profile panel
async fn fetch_detail(api: &ApiClient, user_id: &str) -> Result<UserDetail, ApiError> {
    let user = api.user_by_id(user_id).await?;
    let stats = api.usage_stats(user_id).await?;

    Ok(UserDetail {
        user: UserCard::from(user),
        stats,
    })
}
