// crates/factory-client/src/app.rs

use factory_core::validation::{MAX_NAME_LEN, MAX_NUMBER_COUNT, MAX_VALUE};
use factory_core::{EditSession, GeneratorUnit, SessionKind};
use factory_protocol::InboundEvent;

use crate::controller::{AppController, ControllerError};

pub enum InputMode {
    Normal,
    Editing,
}

/// Form field with keyboard focus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormField {
    Name,
    NumberCount,
    MinValue,
    MaxValue,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::NumberCount => "Children",
            FormField::MinValue => "Lower bound",
            FormField::MaxValue => "Upper bound",
        }
    }

    fn next(self) -> Self {
        match self {
            FormField::Name => FormField::NumberCount,
            FormField::NumberCount => FormField::MinValue,
            FormField::MinValue => FormField::MaxValue,
            FormField::MaxValue => FormField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::MaxValue,
            FormField::NumberCount => FormField::Name,
            FormField::MinValue => FormField::NumberCount,
            FormField::MaxValue => FormField::MinValue,
        }
    }
}

/// Largest number a numeric field accepts from the keyboard. Values
/// above the valid range can be typed; validation marks them.
const MAX_TYPED: i64 = 99_999;

pub struct App {
    pub controller: AppController,

    // UI state
    pub input_mode: InputMode,
    pub focused_field: FormField,
    pub selected_index: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub status_message: Option<String>,

    // Statistics
    pub message_count: u64,
}

impl App {
    pub fn new(controller: AppController) -> Self {
        Self {
            controller,
            input_mode: InputMode::Normal,
            focused_field: FormField::Name,
            selected_index: 0,
            should_quit: false,
            show_help: false,
            status_message: None,
            message_count: 0,
        }
    }

    pub fn selected_unit(&self) -> Option<&GeneratorUnit> {
        self.controller.store().get_index(self.selected_index)
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.controller.active_session()
    }

    pub fn new_unit(&mut self) {
        self.controller.open_create();
        self.enter_form();
    }

    pub fn edit_selected(&mut self) {
        let Some(id) = self.selected_unit().map(|unit| unit.id) else {
            return;
        };
        if self.controller.open_edit(id).is_some() {
            self.enter_form();
        }
    }

    /// Open the selected unit and request its deletion right away.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_unit().map(|unit| unit.id) else {
            return;
        };
        if !self.controller.connection().is_connected() {
            self.report(Err(ControllerError::NotConnected));
            return;
        }
        if self.controller.open_edit(id).is_none() {
            return;
        }
        if let Err(e) = self.controller.delete_active() {
            self.controller.cancel_active();
            self.report(Err(e));
            return;
        }
        self.status_message = Some("delete requested".to_string());
    }

    fn enter_form(&mut self) {
        self.focused_field = FormField::Name;
        self.input_mode = InputMode::Editing;
        self.status_message = None;
    }

    fn leave_form(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    /// Type into the focused field. On numeric fields `+` and `-` step the
    /// value instead.
    pub fn enter_char(&mut self, c: char) {
        let field = self.focused_field;
        if field != FormField::Name {
            match c {
                '+' => return self.step(1),
                '-' => return self.step(-1),
                _ => {}
            }
        }
        let Some(session) = self.controller.active_session_mut() else {
            return;
        };

        let result = match field {
            FormField::Name => {
                if session.draft().name().chars().count() >= MAX_NAME_LEN {
                    return;
                }
                let mut name = session.draft().name().to_string();
                name.push(c);
                session.set_name(name)
            }
            _ => {
                let Some(digit) = c.to_digit(10) else {
                    return;
                };
                let current = field_value(session, field);
                let typed = current * 10 + i64::from(digit);
                if typed > MAX_TYPED {
                    return;
                }
                set_field_value(session, field, typed)
            }
        };
        self.report(result.map_err(ControllerError::from));
    }

    pub fn delete_char(&mut self) {
        let field = self.focused_field;
        let Some(session) = self.controller.active_session_mut() else {
            return;
        };

        let result = match field {
            FormField::Name => {
                let mut name = session.draft().name().to_string();
                if name.pop().is_none() {
                    return;
                }
                session.set_name(name)
            }
            _ => {
                let current = field_value(session, field);
                set_field_value(session, field, current / 10)
            }
        };
        self.report(result.map_err(ControllerError::from));
    }

    /// Step the focused numeric field by `delta`, staying inside its range.
    pub fn step(&mut self, delta: i64) {
        let field = self.focused_field;
        let Some(session) = self.controller.active_session_mut() else {
            return;
        };

        let upper = match field {
            FormField::Name => return,
            FormField::NumberCount => i64::from(MAX_NUMBER_COUNT),
            FormField::MinValue | FormField::MaxValue => i64::from(MAX_VALUE),
        };
        let stepped = (field_value(session, field) + delta).clamp(1, upper);
        let result = set_field_value(session, field, stepped);
        self.report(result.map_err(ControllerError::from));
    }

    pub fn submit(&mut self) {
        if !matches!(self.input_mode, InputMode::Editing) {
            return;
        }
        let result = self.controller.save_active();
        if result.is_ok() {
            self.leave_form();
            self.status_message = Some("saved, waiting for server".to_string());
        } else {
            self.report(result);
        }
    }

    pub fn cancel_input(&mut self) {
        self.controller.cancel_active();
        self.leave_form();
    }

    pub fn delete_unit(&mut self) {
        let result = self.controller.delete_active();
        if result.is_ok() {
            self.leave_form();
            self.status_message = Some("delete requested".to_string());
        } else {
            self.report(result);
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index < self.controller.store().len().saturating_sub(1) {
            self.selected_index += 1;
        }
    }

    pub fn dismiss_error(&mut self) {
        self.controller.dismiss_business_error();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn handle_inbound(&mut self, event: InboundEvent) {
        self.message_count += 1;
        self.controller.handle_inbound(event);

        // Deletes may shrink the list under the cursor.
        let len = self.controller.store().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    /// Title of the open form, e.g. `"New unit"` or `"Edit #3"`.
    pub fn form_title(&self) -> Option<String> {
        self.session().map(|session| match session.kind() {
            SessionKind::Create => "New unit".to_string(),
            SessionKind::Edit(id) => format!("Edit {}", id),
        })
    }

    fn report(&mut self, result: Result<(), ControllerError>) {
        if let Err(e) = result {
            self.status_message = Some(e.to_string());
        }
    }
}

fn field_value(session: &EditSession, field: FormField) -> i64 {
    let draft = session.draft();
    match field {
        FormField::Name => 0,
        FormField::NumberCount => i64::from(draft.number_count()),
        FormField::MinValue => i64::from(draft.min_value()),
        FormField::MaxValue => i64::from(draft.max_value()),
    }
}

fn set_field_value(
    session: &mut EditSession,
    field: FormField,
    value: i64,
) -> Result<(), factory_core::SessionError> {
    match field {
        FormField::Name => Ok(()),
        FormField::NumberCount => session.set_number_count(value.clamp(0, i64::from(u32::MAX)) as u32),
        FormField::MinValue => session.set_min_value(value as i32),
        FormField::MaxValue => session.set_max_value(value as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionManager;
    use crate::transport::TransportMode;
    use factory_core::UnitId;
    use factory_protocol::OutboundMessage;
    use tokio::sync::mpsc;

    fn app_with(units: Vec<GeneratorUnit>) -> (App, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (connection, _preference_rx) = ConnectionManager::new(TransportMode::WebSocket, tx);
        let mut app = App::new(AppController::new(connection));
        app.controller.start();
        app.handle_inbound(InboundEvent::Connect);
        app.handle_inbound(InboundEvent::Snapshot(units));
        (app, rx)
    }

    #[test]
    fn typing_a_new_unit() {
        let (mut app, mut rx) = app_with(vec![]);

        app.new_unit();
        for c in "pump".chars() {
            app.enter_char(c);
        }
        app.next_field();
        app.delete_char();
        app.enter_char('7');
        app.next_field();
        app.step(4);
        app.submit();

        assert!(matches!(app.input_mode, InputMode::Normal));
        match rx.try_recv().unwrap() {
            OutboundMessage::CreateUnit(fields) => {
                assert_eq!(fields.name, "pump");
                assert_eq!(fields.number_count, 7);
                assert_eq!(fields.min_value, 5);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unchanged_edit_is_refused() {
        let (mut app, mut rx) = app_with(vec![GeneratorUnit::new(1, "a", 1, 10, vec![3])]);

        app.edit_selected();
        app.submit();

        assert!(matches!(app.input_mode, InputMode::Editing));
        assert!(app.status_message.is_some());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn selection_follows_deletes() {
        let (mut app, _rx) = app_with(vec![
            GeneratorUnit::new(1, "a", 1, 10, vec![5]),
            GeneratorUnit::new(2, "b", 1, 10, vec![6]),
        ]);

        app.move_selection_down();
        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.handle_inbound(InboundEvent::Deleted(UnitId(2)));
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.selected_unit().map(|u| u.id), Some(UnitId(1)));
    }

    #[test]
    fn plus_and_minus_step_numeric_fields() {
        let (mut app, _rx) = app_with(vec![]);

        app.new_unit();
        app.enter_char('+');
        assert_eq!(app.session().unwrap().draft().name(), "+");

        app.next_field();
        app.enter_char('+');
        app.enter_char('+');
        assert_eq!(app.session().unwrap().draft().number_count(), 3);
        app.enter_char('-');
        assert_eq!(app.session().unwrap().draft().number_count(), 2);

        app.next_field();
        app.enter_char('-');
        assert_eq!(app.session().unwrap().draft().min_value(), 1);
    }

    #[test]
    fn delete_selected_while_disconnected_opens_nothing() {
        let (mut app, mut rx) = app_with(vec![GeneratorUnit::new(8, "h", 1, 10, vec![9])]);
        app.handle_inbound(InboundEvent::Disconnect {
            reason: "eof".into(),
        });

        app.delete_selected();

        assert!(app.session().is_none());
        assert!(app.form_title().is_none());
        assert!(matches!(app.input_mode, InputMode::Normal));
        assert_eq!(app.status_message.as_deref(), Some("not connected"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn delete_selected_sends_delete() {
        let (mut app, mut rx) = app_with(vec![GeneratorUnit::new(8, "h", 1, 10, vec![9])]);
        app.delete_selected();
        assert_eq!(rx.try_recv().unwrap(), OutboundMessage::DeleteUnit(UnitId(8)));
        assert!(app.session().is_none());
    }
}
