//! App shell: renders the screen selected by the session core and turns
//! pointer/keyboard input into session commands.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use rand::{rngs::ThreadRng, Rng};
use session_core::{
    feed::DashboardFeeds, Credentials, EmergencyForm, SessionCommand, SessionEvent,
};
use shared::domain::{
    BloodType, BroadcastSummary, EmergencyRequest, UrgencyLevel, UserProfile, UserRole, ViewState,
};

use crate::controller::events::{
    banner_for_rejection, stock_color, urgency_color, StatusBanner, StatusBannerSeverity,
};
use crate::controller::orchestration::dispatch_session_command;

const MEDICAL_RED: egui::Color32 = egui::Color32::from_rgb(0xdc, 0x26, 0x26);
const MEDICAL_GREEN: egui::Color32 = egui::Color32::from_rgb(0x16, 0xa3, 0x4a);
const MEDICAL_BLUE: egui::Color32 = egui::Color32::from_rgb(0x25, 0x63, 0xeb);

const NOTIFICATION_JITTER_PERIOD: Duration = Duration::from_secs(10);
const AGE_JITTER_PERIOD: Duration = Duration::from_secs(30);

/// Interval gate for the cosmetic feed jitter.
struct JitterTimer {
    last: Instant,
    period: Duration,
}

impl JitterTimer {
    fn new(period: Duration) -> Self {
        Self {
            last: Instant::now(),
            period,
        }
    }

    fn due(&mut self) -> bool {
        if self.last.elapsed() >= self.period {
            self.last = Instant::now();
            return true;
        }
        false
    }
}

pub struct BloodConnectApp {
    cmd_tx: Sender<SessionCommand>,
    event_rx: Receiver<SessionEvent>,

    view: ViewState,
    profile: Option<UserProfile>,

    // Sign-in form buffers; validation happens in the session core.
    auth_name: String,
    auth_phone: String,
    auth_location: String,
    auth_blood_type: Option<BloodType>,
    selected_role: UserRole,

    // Local editable copy of the draft the session opened.
    emergency_form: Option<EmergencyForm>,
    submitted_request: Option<EmergencyRequest>,
    broadcast_summary: Option<BroadcastSummary>,

    // Presentation-owned copy of the illustrative feeds; only the cosmetic
    // jitter mutates it.
    feeds: DashboardFeeds,
    rng: ThreadRng,
    notification_jitter: JitterTimer,
    age_jitter: JitterTimer,

    status: String,
    status_banner: Option<StatusBanner>,
    ack_notice: Option<String>,
    emergency_trigger_focused: bool,
    tick: u64,
}

impl BloodConnectApp {
    pub fn new(cmd_tx: Sender<SessionCommand>, event_rx: Receiver<SessionEvent>) -> Self {
        Self {
            cmd_tx,
            event_rx,
            view: ViewState::Auth,
            profile: None,
            auth_name: String::new(),
            auth_phone: String::new(),
            auth_location: String::new(),
            auth_blood_type: None,
            selected_role: UserRole::Donor,
            emergency_form: None,
            submitted_request: None,
            broadcast_summary: None,
            feeds: DashboardFeeds::demo(),
            rng: rand::thread_rng(),
            notification_jitter: JitterTimer::new(NOTIFICATION_JITTER_PERIOD),
            age_jitter: JitterTimer::new(AGE_JITTER_PERIOD),
            status: "Not signed in".to_string(),
            status_banner: None,
            ack_notice: None,
            emergency_trigger_focused: false,
            tick: 0,
        }
    }

    fn dispatch(&mut self, command: SessionCommand) {
        dispatch_session_command(&self.cmd_tx, command, &mut self.status);
    }

    fn process_session_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                SessionEvent::RoleSelected(role) => {
                    self.selected_role = role;
                }
                SessionEvent::SignedIn(profile) => {
                    self.status = format!("Welcome {}! Redirecting to your dashboard...", profile.name);
                    self.status_banner = None;
                    self.profile = Some(profile);
                }
                SessionEvent::SignedOut => {
                    self.profile = None;
                    self.emergency_form = None;
                    self.submitted_request = None;
                    self.broadcast_summary = None;
                    self.feeds = DashboardFeeds::demo();
                    self.ack_notice = None;
                    self.status = "Signed out".to_string();
                }
                SessionEvent::ViewChanged(view) => {
                    self.view = view;
                }
                SessionEvent::EmergencyFormOpened(form) => {
                    self.emergency_form = Some(form);
                }
                SessionEvent::EmergencySubmitted(request) => {
                    self.submitted_request = Some(request);
                    self.broadcast_summary = None;
                }
                SessionEvent::BroadcastCompleted { request, summary } => {
                    self.submitted_request = Some(request);
                    self.broadcast_summary = Some(summary);
                }
                SessionEvent::ResponseAcknowledged(message) => {
                    self.ack_notice = Some(message);
                }
                SessionEvent::Rejected(err) => {
                    self.status = format!("Rejected: {err}");
                    if let Some(banner) = banner_for_rejection(&err) {
                        self.status_banner = Some(banner);
                    }
                }
            }
        }
    }

    fn apply_cosmetic_jitter(&mut self) {
        if self.view == ViewState::DonorDashboard && self.notification_jitter.due() {
            let sample = self.rng.gen::<f64>();
            self.feeds.bump_notification_count(sample);
        }
        if self.age_jitter.due() {
            let rng = &mut self.rng;
            self.feeds.age_time_labels(|| rng.gen::<f64>());
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if self.view == ViewState::EmergencyForm
            && ctx.input(|i| i.key_pressed(egui::Key::Escape))
        {
            self.dispatch(SessionCommand::DismissEmergency);
        }
        if self.view == ViewState::RecipientDashboard
            && self.emergency_trigger_focused
            && ctx.input(|i| i.key_pressed(egui::Key::Enter))
        {
            self.dispatch(SessionCommand::OpenEmergencyForm);
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.status_banner.clone() else {
            return;
        };
        let (fill, stroke) = match banner.severity {
            StatusBannerSeverity::Error => (
                egui::Color32::from_rgb(0x45, 0x16, 0x16),
                egui::Stroke::new(1.0, MEDICAL_RED),
            ),
            StatusBannerSeverity::Info => (
                egui::Color32::from_rgb(0x10, 0x2a, 0x1a),
                egui::Stroke::new(1.0, MEDICAL_GREEN),
            ),
        };
        egui::Frame::NONE
            .fill(fill)
            .stroke(stroke)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&banner.message).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn show_ack_notice(&mut self, ui: &mut egui::Ui) {
        let Some(notice) = self.ack_notice.clone() else {
            return;
        };
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(0x10, 0x2a, 0x1a))
            .stroke(egui::Stroke::new(1.0, MEDICAL_GREEN))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&notice).color(MEDICAL_GREEN));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("OK").clicked() {
                            self.ack_notice = None;
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn form_text_field(
        ui: &mut egui::Ui,
        id: &'static str,
        label: &str,
        hint: &str,
        value: &mut String,
    ) -> egui::Response {
        ui.label(egui::RichText::new(label).strong());
        let edit = egui::TextEdit::singleline(value)
            .id_salt(id)
            .hint_text(hint)
            .desired_width(f32::INFINITY);
        ui.add_sized([ui.available_width(), 32.0], edit)
    }

    // ---- auth ----

    fn show_auth_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let card_width = avail.x.clamp(440.0, 560.0);
            ui.add_space((avail.y * 0.08).clamp(12.0, 70.0));

            ui.vertical_centered(|ui| {
                ui.set_width(card_width);
                egui::Frame::NONE
                    .fill(ui.visuals().panel_fill)
                    .corner_radius(14.0)
                    .stroke(egui::Stroke::new(
                        1.0,
                        ui.visuals().widgets.noninteractive.bg_stroke.color,
                    ))
                    .inner_margin(egui::Margin::symmetric(20, 18))
                    .show(ui, |ui| {
                        ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);

                        ui.vertical_centered(|ui| {
                            ui.label(egui::RichText::new("\u{1fa78}").size(28.0));
                            ui.heading(
                                egui::RichText::new("Blood Connect")
                                    .color(MEDICAL_RED)
                                    .strong(),
                            );
                            ui.weak("Saving lives, one donation at a time");
                        });

                        ui.add_space(6.0);
                        self.show_status_banner(ui);

                        ui.small("Quick Start (Demo)");
                        ui.horizontal(|ui| {
                            let half = (ui.available_width() - 8.0) / 2.0;
                            let donor_btn = egui::Button::new(
                                egui::RichText::new("Login as Donor").strong(),
                            )
                            .fill(MEDICAL_GREEN)
                            .min_size(egui::vec2(half, 34.0));
                            if ui.add(donor_btn).clicked() {
                                self.dispatch(SessionCommand::QuickSignIn(UserRole::Donor));
                            }
                            let recipient_btn = egui::Button::new(
                                egui::RichText::new("Login as Recipient").strong(),
                            )
                            .fill(MEDICAL_BLUE)
                            .min_size(egui::vec2(half, 34.0));
                            if ui.add(recipient_btn).clicked() {
                                self.dispatch(SessionCommand::QuickSignIn(UserRole::Recipient));
                            }
                        });

                        ui.add_space(4.0);
                        ui.separator();
                        ui.small("Or continue with the sign-up form");

                        let name_resp = Self::form_text_field(
                            ui,
                            "auth_name",
                            "Full Name",
                            "John Doe",
                            &mut self.auth_name,
                        );
                        let phone_resp = Self::form_text_field(
                            ui,
                            "auth_phone",
                            "Phone",
                            "+1234567890",
                            &mut self.auth_phone,
                        );
                        let location_resp = Self::form_text_field(
                            ui,
                            "auth_location",
                            "Location",
                            "City, neighborhood or hospital",
                            &mut self.auth_location,
                        );

                        ui.label(egui::RichText::new("Blood Type").strong());
                        egui::Grid::new("auth_blood_type_grid")
                            .num_columns(4)
                            .spacing(egui::vec2(6.0, 6.0))
                            .show(ui, |ui| {
                                for (index, blood_type) in BloodType::ALL.into_iter().enumerate() {
                                    let selected = self.auth_blood_type == Some(blood_type);
                                    let mut btn =
                                        egui::Button::new(blood_type.label())
                                            .min_size(egui::vec2(74.0, 30.0));
                                    if selected {
                                        btn = btn.fill(MEDICAL_RED);
                                    }
                                    if ui.add(btn).clicked() {
                                        self.auth_blood_type = Some(blood_type);
                                    }
                                    if index % 4 == 3 {
                                        ui.end_row();
                                    }
                                }
                            });

                        ui.label(egui::RichText::new("I want to").strong());
                        ui.horizontal(|ui| {
                            let half = (ui.available_width() - 8.0) / 2.0;
                            let mut donate =
                                egui::Button::new("\u{2764} Donate Blood").min_size(egui::vec2(half, 30.0));
                            if self.selected_role == UserRole::Donor {
                                donate = donate.fill(MEDICAL_GREEN);
                            }
                            if ui.add(donate).clicked() {
                                self.selected_role = UserRole::Donor;
                                self.dispatch(SessionCommand::SelectRole(UserRole::Donor));
                            }
                            let mut request =
                                egui::Button::new("\u{1f198} Request Blood").min_size(egui::vec2(half, 30.0));
                            if self.selected_role == UserRole::Recipient {
                                request = request.fill(MEDICAL_BLUE);
                            }
                            if ui.add(request).clicked() {
                                self.selected_role = UserRole::Recipient;
                                self.dispatch(SessionCommand::SelectRole(UserRole::Recipient));
                            }
                        });

                        let enter_pressed = ctx.input(|i| i.key_pressed(egui::Key::Enter));
                        let field_focused = name_resp.has_focus()
                            || phone_resp.has_focus()
                            || location_resp.has_focus();

                        let submit = egui::Button::new(
                            egui::RichText::new("Create Account").strong().size(16.0),
                        )
                        .fill(MEDICAL_RED)
                        .min_size(egui::vec2(ui.available_width(), 38.0));
                        if ui.add(submit).clicked() || (enter_pressed && field_focused) {
                            self.try_sign_in();
                        }

                        ui.add_space(4.0);
                        ui.horizontal_wrapped(|ui| {
                            ui.small("Status:");
                            ui.small(egui::RichText::new(&self.status).weak());
                        });
                    });
            });
        });
    }

    fn try_sign_in(&mut self) {
        self.status_banner = None;
        let role = self.selected_role;
        self.dispatch(SessionCommand::SelectRole(role));
        let credentials = Credentials {
            name: self.auth_name.clone(),
            phone: self.auth_phone.clone(),
            blood_type: self
                .auth_blood_type
                .map(|blood_type| blood_type.label().to_string())
                .unwrap_or_default(),
            location: self.auth_location.clone(),
        };
        self.dispatch(SessionCommand::SubmitCredentials(credentials));
    }

    // ---- dashboards ----

    fn show_profile_header(&mut self, ui: &mut egui::Ui, accent: egui::Color32) {
        let Some(profile) = self.profile.clone() else {
            return;
        };
        ui.horizontal(|ui| {
            egui::Frame::NONE
                .fill(accent)
                .corner_radius(24.0)
                .inner_margin(egui::Margin::symmetric(12, 10))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(profile.initials())
                            .color(egui::Color32::WHITE)
                            .strong()
                            .size(16.0),
                    );
                });
            ui.vertical(|ui| {
                ui.heading(format!("Welcome, {}", profile.name));
                ui.horizontal(|ui| {
                    badge(
                        ui,
                        &format!("{} {}", profile.blood_type, profile.role.badge_noun()),
                        accent,
                    );
                    badge_outline(ui, "Verified");
                });
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Sign out").clicked() {
                    self.dispatch(SessionCommand::SignOut);
                }
                if self.profile.as_ref().map(|p| p.role) == Some(UserRole::Donor) {
                    ui.label(
                        egui::RichText::new(format!(
                            "\u{1f514} {}",
                            self.feeds.notification_count
                        ))
                        .color(MEDICAL_RED)
                        .strong(),
                    );
                }
            });
        });
        ui.add_space(8.0);
    }

    fn show_donor_dashboard(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_profile_header(ui, MEDICAL_GREEN);
                self.show_ack_notice(ui);
                self.show_status_banner(ui);

                let stats = self.feeds.donor_stats;
                ui.horizontal(|ui| {
                    stat_tile(ui, &stats.total_donations.to_string(), "Total Donations");
                    stat_tile(ui, &stats.badges_earned.to_string(), "Badges Earned");
                    stat_tile(
                        ui,
                        &stats.days_until_eligible.to_string(),
                        "Days Until Eligible",
                    );
                    stat_tile(ui, &stats.lives_saved.to_string(), "Lives Saved");
                });
                ui.add_space(10.0);

                ui.heading("Nearby Blood Requests");
                let nearby = self.feeds.nearby_requests.clone();
                for request in &nearby {
                    egui::Frame::NONE
                        .stroke(egui::Stroke::new(
                            1.0,
                            ui.visuals().widgets.noninteractive.bg_stroke.color,
                        ))
                        .corner_radius(8.0)
                        .inner_margin(egui::Margin::symmetric(10, 8))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                badge(ui, request.blood_type.label(), MEDICAL_RED);
                                ui.vertical(|ui| {
                                    ui.label(egui::RichText::new(&request.location).strong());
                                    ui.weak(format!(
                                        "{:.1} km \u{2022} {} min ago",
                                        request.distance_km, request.minutes_ago
                                    ));
                                });
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui
                                            .add(
                                                egui::Button::new("Respond")
                                                    .fill(MEDICAL_GREEN),
                                            )
                                            .clicked()
                                        {
                                            self.dispatch(SessionCommand::RespondToRequest(
                                                request.id,
                                            ));
                                        }
                                        badge(ui, request.urgency.label(), urgency_color(request.urgency));
                                    },
                                );
                            });
                        });
                    ui.add_space(6.0);
                }
                if ui.button("View Blood Map").clicked() {
                    self.dispatch(SessionCommand::NavigateToMap);
                }
                ui.add_space(10.0);

                ui.heading(format!("Notifications ({})", self.feeds.notification_count));
                for notification in &self.feeds.notifications {
                    ui.horizontal(|ui| {
                        if notification.urgent {
                            ui.label(egui::RichText::new("\u{26a0}").color(MEDICAL_RED));
                        }
                        ui.vertical(|ui| {
                            ui.label(&notification.message);
                            ui.weak(notification.age.to_string());
                        });
                    });
                    ui.add_space(4.0);
                }
                ui.add_space(10.0);

                ui.heading("Achievements");
                for achievement in &self.feeds.achievements {
                    ui.horizontal(|ui| {
                        let mark = if achievement.earned { "\u{2b50}" } else { "\u{2606}" };
                        ui.label(mark);
                        ui.label(egui::RichText::new(&achievement.name).strong());
                        ui.weak(&achievement.description);
                    });
                }
            });
        });
    }

    fn show_recipient_dashboard(&mut self, ctx: &egui::Context) {
        self.emergency_trigger_focused = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_profile_header(ui, MEDICAL_BLUE);
                self.show_ack_notice(ui);
                self.show_status_banner(ui);

                let emergency_btn = egui::Button::new(
                    egui::RichText::new("\u{1f6a8} Emergency Blood Request")
                        .strong()
                        .size(17.0)
                        .color(egui::Color32::WHITE),
                )
                .fill(MEDICAL_RED)
                .min_size(egui::vec2(ui.available_width(), 44.0));
                let response = ui.add(emergency_btn);
                self.emergency_trigger_focused = response.has_focus();
                if response.clicked() {
                    self.dispatch(SessionCommand::OpenEmergencyForm);
                }
                ui.add_space(10.0);

                let blood_type = self.profile.as_ref().map(|profile| profile.blood_type);
                let active = self.feeds.active_request.clone();
                ui.heading("Active Blood Requests");
                egui::Frame::NONE
                    .stroke(egui::Stroke::new(1.0, urgency_color(active.urgency)))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(10, 8))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            if let Some(blood_type) = blood_type {
                                badge(ui, blood_type.label(), MEDICAL_RED);
                            }
                            ui.vertical(|ui| {
                                ui.label(egui::RichText::new(&active.location).strong());
                                ui.weak(format!("Posted {} min ago", active.minutes_ago));
                            });
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    ui.weak(format!("{} responses", active.responses));
                                    badge(ui, active.urgency.label(), urgency_color(active.urgency));
                                },
                            );
                        });
                    });
                ui.add_space(10.0);

                ui.heading("Donor Responses");
                let donors = self.feeds.donor_responses.clone();
                for donor in &donors {
                    egui::Frame::NONE
                        .stroke(egui::Stroke::new(
                            1.0,
                            ui.visuals().widgets.noninteractive.bg_stroke.color,
                        ))
                        .corner_radius(8.0)
                        .inner_margin(egui::Margin::symmetric(10, 8))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                badge(ui, donor.blood_type.label(), MEDICAL_BLUE);
                                ui.vertical(|ui| {
                                    ui.horizontal(|ui| {
                                        ui.label(egui::RichText::new(&donor.name).strong());
                                        if donor.verified {
                                            badge_outline(ui, "Verified");
                                        }
                                    });
                                    ui.weak(format!(
                                        "{:.1} km \u{2022} ETA: {} min",
                                        donor.distance_km, donor.eta_minutes
                                    ));
                                });
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui
                                            .add(egui::Button::new("Contact").fill(MEDICAL_BLUE))
                                            .clicked()
                                        {
                                            self.dispatch(SessionCommand::ContactDonor(donor.id));
                                        }
                                    },
                                );
                            });
                        });
                    ui.add_space(6.0);
                }

                if ui.button("View Blood Map").clicked() {
                    self.dispatch(SessionCommand::NavigateToMap);
                }
            });
        });
    }

    // ---- map ----

    fn show_map(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("map_sidebar")
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading("Emergency Requests");
                    let emergencies = self.feeds.map_emergencies.clone();
                    for request in &emergencies {
                        ui.horizontal(|ui| {
                            badge(ui, request.blood_type.label(), MEDICAL_RED);
                            ui.vertical(|ui| {
                                ui.label(egui::RichText::new(&request.location).strong());
                                ui.weak(format!(
                                    "{} \u{2022} {} min ago",
                                    request.urgency, request.minutes_ago
                                ));
                            });
                        });
                        ui.add_space(4.0);
                    }
                    ui.separator();

                    ui.heading("Available Donors");
                    for donor in self
                        .feeds
                        .map_donors
                        .iter()
                        .filter(|donor| {
                            donor.availability == shared::domain::DonorAvailability::Available
                        })
                    {
                        ui.horizontal(|ui| {
                            badge(ui, donor.blood_type.label(), MEDICAL_GREEN);
                            ui.vertical(|ui| {
                                ui.label(egui::RichText::new(&donor.name).strong());
                                ui.weak(format!("{:.1} km away", donor.distance_km));
                            });
                        });
                        ui.add_space(4.0);
                    }
                    ui.separator();

                    ui.heading("Blood Banks");
                    for bank in &self.feeds.blood_banks {
                        ui.horizontal(|ui| {
                            badge(ui, bank.stock.label(), stock_color(bank.stock));
                            ui.vertical(|ui| {
                                ui.label(egui::RichText::new(&bank.name).strong());
                                ui.weak(format!("{} \u{2022} {:.1} km", bank.address, bank.distance_km));
                            });
                        });
                        ui.add_space(4.0);
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("\u{2190} Back to Dashboard").clicked() {
                    self.dispatch(SessionCommand::NavigateBack);
                }
                ui.heading("Blood Map");
            });
            ui.weak("Simulated area map; pin positions are illustrative.");
            ui.add_space(6.0);

            let desired = egui::vec2(ui.available_width(), ui.available_height().max(320.0));
            let (response, painter) = ui.allocate_painter(desired, egui::Sense::hover());
            let rect = response.rect;
            painter.rect_filled(rect, 8.0, egui::Color32::from_rgb(0x14, 0x1d, 0x26));

            let donors = self.feeds.map_donors.clone();
            for (index, donor) in donors.iter().enumerate() {
                let pos = pin_position(rect, index, donors.len());
                let color = match donor.availability {
                    shared::domain::DonorAvailability::Available => MEDICAL_GREEN,
                    shared::domain::DonorAvailability::Busy => egui::Color32::GRAY,
                };
                painter.circle_filled(pos, 9.0, color);
                painter.text(
                    pos + egui::vec2(0.0, 14.0),
                    egui::Align2::CENTER_TOP,
                    format!("{} ({})", donor.name, donor.blood_type),
                    egui::FontId::proportional(11.0),
                    ui.visuals().text_color(),
                );
            }

            let emergencies = self.feeds.map_emergencies.clone();
            for (index, request) in emergencies.iter().enumerate() {
                let pos = pin_position(rect, donors.len() + index, donors.len() + emergencies.len());
                painter.circle_filled(pos, 11.0, MEDICAL_RED);
                painter.text(
                    pos,
                    egui::Align2::CENTER_CENTER,
                    request.blood_type.label(),
                    egui::FontId::proportional(10.0),
                    egui::Color32::WHITE,
                );
            }

            // The viewer's own position, centered like the demo's "you" pin.
            let center = rect.center();
            painter.circle_filled(center, 6.0, MEDICAL_BLUE);
            painter.circle_stroke(center, 10.0, egui::Stroke::new(1.5, MEDICAL_BLUE));
        });
    }

    // ---- emergency flow ----

    fn show_emergency_form(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if ui.button("\u{2190} Back to Dashboard").clicked() {
                    self.dispatch(SessionCommand::DismissEmergency);
                }
                ui.add_space(6.0);

                ui.heading(
                    egui::RichText::new("\u{26a0} Emergency Blood Request").color(MEDICAL_RED),
                );
                ui.weak(
                    "This will immediately notify nearby donors and blood banks. \
                     Please ensure all information is accurate.",
                );
                ui.add_space(8.0);
                self.show_status_banner(ui);

                let Some(mut form) = self.emergency_form.clone() else {
                    ui.weak("Preparing the request form...");
                    return;
                };

                egui::Frame::NONE
                    .fill(egui::Color32::from_rgb(0x38, 0x12, 0x12))
                    .stroke(egui::Stroke::new(1.0, MEDICAL_RED))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(12, 10))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new("Critical Emergency?")
                                .color(MEDICAL_RED)
                                .strong(),
                        );
                        ui.weak(
                            "For immediate life-threatening situations, use the 1-click \
                             emergency request with pre-filled details.",
                        );
                        let quick = egui::Button::new(
                            egui::RichText::new("SEND EMERGENCY REQUEST NOW")
                                .strong()
                                .color(egui::Color32::WHITE),
                        )
                        .fill(MEDICAL_RED)
                        .min_size(egui::vec2(ui.available_width(), 38.0));
                        if ui.add(quick).clicked() {
                            self.dispatch(SessionCommand::QuickEmergencyRequest);
                        }
                    });

                ui.add_space(8.0);
                ui.separator();
                ui.small("Or customize your request");
                ui.add_space(4.0);

                ui.label(egui::RichText::new("Blood Type Required").strong());
                ui.add_enabled(
                    false,
                    egui::TextEdit::singleline(&mut form.blood_type.label().to_string())
                        .id_salt("emergency_blood_type"),
                );

                Self::form_text_field(
                    ui,
                    "emergency_units",
                    "Units Needed",
                    "2",
                    &mut form.units_needed,
                );
                Self::form_text_field(
                    ui,
                    "emergency_location",
                    "Hospital/Location",
                    "Enter hospital name or address",
                    &mut form.location,
                );

                ui.label(egui::RichText::new("Urgency Level").strong());
                ui.horizontal(|ui| {
                    for level in UrgencyLevel::ALL {
                        let mut btn = egui::Button::new(level.label())
                            .min_size(egui::vec2(90.0, 28.0));
                        if form.urgency == level {
                            btn = btn.fill(urgency_color(level));
                        }
                        if ui.add(btn).clicked() {
                            form.urgency = level;
                        }
                    }
                });

                ui.label(egui::RichText::new("Additional Notes").strong());
                ui.add_sized(
                    [ui.available_width(), 70.0],
                    egui::TextEdit::multiline(&mut form.notes)
                        .id_salt("emergency_notes")
                        .hint_text("Provide any additional details about the emergency..."),
                );

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let send = egui::Button::new(
                        egui::RichText::new("\u{26a0} Send Emergency Request")
                            .strong()
                            .color(egui::Color32::WHITE),
                    )
                    .fill(MEDICAL_RED)
                    .min_size(egui::vec2(ui.available_width() - 110.0, 38.0));
                    if ui.add(send).clicked() {
                        self.dispatch(SessionCommand::SubmitEmergencyForm(form.clone()));
                    }
                    if ui
                        .add(egui::Button::new("Cancel").min_size(egui::vec2(100.0, 38.0)))
                        .clicked()
                    {
                        self.dispatch(SessionCommand::DismissEmergency);
                    }
                });
                ui.add_space(4.0);
                ui.small(
                    "By submitting this request, you confirm that this is a genuine medical \
                     emergency. False requests may result in account suspension.",
                );

                self.emergency_form = Some(form);
            });
        });
    }

    fn show_emergency_processing(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            ui.add_space((avail.y * 0.22).clamp(20.0, 160.0));
            ui.vertical_centered(|ui| {
                ui.set_width(avail.x.clamp(360.0, 460.0));
                egui::Frame::NONE
                    .fill(ui.visuals().panel_fill)
                    .corner_radius(14.0)
                    .stroke(egui::Stroke::new(
                        1.0,
                        ui.visuals().widgets.noninteractive.bg_stroke.color,
                    ))
                    .inner_margin(egui::Margin::symmetric(20, 18))
                    .show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            ui.add(egui::Spinner::new().size(36.0).color(MEDICAL_RED));
                            ui.add_space(8.0);
                            ui.heading("Processing Emergency Request");
                            ui.add(egui::ProgressBar::new(0.66));
                            ui.weak("Broadcasting your request to nearby donors...");
                        });
                        ui.add_space(8.0);
                        checklist_row(ui, "Finding compatible donors", true);
                        checklist_row(ui, "Notifying blood banks", true);
                        checklist_row(ui, "Alerting emergency contacts", false);
                    });
            });
        });
    }

    fn show_emergency_success(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if ui.button("\u{2190} Back to Dashboard").clicked() {
                    self.dispatch(SessionCommand::DismissEmergency);
                }
                ui.add_space(6.0);

                let summary = self.broadcast_summary.unwrap_or_else(BroadcastSummary::demo);
                egui::Frame::NONE
                    .fill(egui::Color32::from_rgb(0x10, 0x2a, 0x1a))
                    .stroke(egui::Stroke::new(1.0, MEDICAL_GREEN))
                    .corner_radius(10.0)
                    .inner_margin(egui::Margin::symmetric(14, 12))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new("\u{2705}").size(24.0));
                            ui.vertical(|ui| {
                                ui.heading(
                                    egui::RichText::new("Emergency Request Sent!")
                                        .color(MEDICAL_GREEN),
                                );
                                ui.label(format!(
                                    "Your request has been broadcast to {} nearby donors and {} blood banks.",
                                    summary.donors_notified, summary.blood_banks_contacted
                                ));
                            });
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    badge(ui, "Active", MEDICAL_GREEN);
                                },
                            );
                        });
                    });
                ui.add_space(10.0);

                if let Some(request) = self.submitted_request.clone() {
                    ui.heading("Request Details");
                    egui::Grid::new("request_details")
                        .num_columns(2)
                        .spacing(egui::vec2(24.0, 6.0))
                        .show(ui, |ui| {
                            ui.weak("Blood Type");
                            badge(ui, request.blood_type.label(), MEDICAL_RED);
                            ui.end_row();
                            ui.weak("Units Needed");
                            ui.label(format!("{} units", request.units_needed));
                            ui.end_row();
                            ui.weak("Location");
                            ui.label(&request.location);
                            ui.end_row();
                            ui.weak("Urgency");
                            badge(ui, request.urgency.label(), urgency_color(request.urgency));
                            ui.end_row();
                        });
                    if !request.notes.is_empty() {
                        ui.weak("Additional Notes");
                        ui.label(&request.notes);
                    }
                    ui.add_space(10.0);
                }

                ui.heading("Response Statistics");
                progress_row(ui, "Donors Notified", summary.donors_notified, 1.0);
                progress_row(ui, "Responses Received", summary.responses_received, 0.25);
                progress_row(ui, "Blood Banks Contacted", summary.blood_banks_contacted, 1.0);
                ui.add_space(10.0);

                ui.heading("Estimated Response Time");
                ui.label(
                    egui::RichText::new(format!(
                        "{}-{} min",
                        summary.estimated_response_minutes.0, summary.estimated_response_minutes.1
                    ))
                    .color(MEDICAL_GREEN)
                    .strong()
                    .size(26.0),
                );
                ui.weak("Based on current donor locations and traffic");
            });
        });
    }
}

fn badge(ui: &mut egui::Ui, text: &str, fill: egui::Color32) {
    egui::Frame::NONE
        .fill(fill)
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(8, 3))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(text)
                    .color(egui::Color32::WHITE)
                    .strong()
                    .size(12.0),
            );
        });
}

fn badge_outline(ui: &mut egui::Ui, text: &str) {
    egui::Frame::NONE
        .stroke(egui::Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(8, 3))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).size(12.0));
        });
}

fn stat_tile(ui: &mut egui::Ui, value: &str, caption: &str) {
    egui::Frame::NONE
        .stroke(egui::Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(14, 10))
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(value).strong().size(22.0));
                ui.weak(caption);
            });
        });
}

fn checklist_row(ui: &mut egui::Ui, label: &str, done: bool) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if done {
                ui.label(egui::RichText::new("\u{2713}").color(MEDICAL_GREEN));
            } else {
                ui.add(egui::Spinner::new().size(14.0).color(MEDICAL_RED));
            }
        });
    });
}

fn progress_row(ui: &mut egui::Ui, label: &str, value: u32, fraction: f32) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(value.to_string());
        });
    });
    ui.add(egui::ProgressBar::new(fraction));
    ui.add_space(4.0);
}

/// Deterministic schematic placement: pins spread left-to-right, staggered
/// between two bands so labels do not overlap.
fn pin_position(rect: egui::Rect, index: usize, count: usize) -> egui::Pos2 {
    let count = count.max(1) as f32;
    let t = (index as f32 + 0.5) / count;
    let x = rect.left() + rect.width() * (0.12 + 0.76 * t);
    let y = rect.top()
        + rect.height()
            * if index % 2 == 0 {
                0.32
            } else {
                0.62
            };
    egui::pos2(x, y)
}

impl eframe::App for BloodConnectApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick = self.tick.wrapping_add(1);

        self.process_session_events();
        self.apply_cosmetic_jitter();
        self.handle_keyboard(ctx);

        match self.view {
            ViewState::Auth => self.show_auth_screen(ctx),
            ViewState::DonorDashboard => self.show_donor_dashboard(ctx),
            ViewState::RecipientDashboard => self.show_recipient_dashboard(ctx),
            ViewState::Map => self.show_map(ctx),
            ViewState::EmergencyForm => self.show_emergency_form(ctx),
            ViewState::EmergencyProcessing => self.show_emergency_processing(ctx),
            ViewState::EmergencySuccess => self.show_emergency_success(ctx),
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_positions_stay_inside_the_map_rect() {
        let rect = egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(600.0, 400.0));
        for index in 0..6 {
            let pos = pin_position(rect, index, 6);
            assert!(rect.contains(pos), "pin {index} at {pos:?} escaped {rect:?}");
        }
    }

    #[test]
    fn pins_alternate_between_two_bands() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let upper = pin_position(rect, 0, 4).y;
        let lower = pin_position(rect, 1, 4).y;
        assert!(upper < lower);
    }

    #[test]
    fn jitter_timer_only_fires_after_its_period() {
        let mut timer = JitterTimer::new(Duration::from_secs(3600));
        assert!(!timer.due());

        let mut expired = JitterTimer::new(Duration::ZERO);
        assert!(expired.due());
    }
}
