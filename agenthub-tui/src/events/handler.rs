use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    Up,
    Down,
    Left,
    Right,
    Top,
    Bottom,
    Select,
    Back,
    Refresh,
    ToggleTheme,
    ResetTheme,
    Help,
    GoToView(usize),
    New,
    Delete,
    CancelStream,
    AddInstruction,
    AddApp,
    AddResource,
    StartInput,
    InputChar(char),
    InputBackspace,
    InputSubmit,
    InputCancel,
    NextField,
    PrevField,
    DialogConfirm,
    DialogCancel,
    DialogSwitch,
    DialogExecute,
    Resize { width: u16, height: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the message line of the Chat or Tasks view.
    Editing,
    Dialog,
    Form,
}

/// Translates terminal events into actions for the current input mode.
pub struct EventHandler {
    input_mode: InputMode,
    terminal_size: Option<(u16, u16)>,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            input_mode: InputMode::Normal,
            terminal_size: None,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    pub fn terminal_size(&self) -> Option<(u16, u16)> {
        self.terminal_size
    }

    pub fn handle_event(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.handle_resize(width, height),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode_key(key),
            InputMode::Editing | InputMode::Form => self.handle_text_key(key),
            InputMode::Dialog => self.handle_dialog_key(key),
        }
    }

    fn handle_normal_mode_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Tab => Some(Action::NextView),
            KeyCode::BackTab => Some(Action::PrevView),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::Left),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::Right),
            KeyCode::Char('g') => Some(Action::Top),
            KeyCode::Char('G') => Some(Action::Bottom),
            KeyCode::Enter => Some(Action::Select),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('T') => Some(Action::ResetTheme),
            KeyCode::Char('?') => Some(Action::Help),
            KeyCode::Char('n') => Some(Action::New),
            KeyCode::Char('x') | KeyCode::Delete => Some(Action::Delete),
            KeyCode::Char('c') => Some(Action::CancelStream),
            KeyCode::Char('i') => Some(Action::AddInstruction),
            KeyCode::Char('a') => Some(Action::AddApp),
            KeyCode::Char('f') => Some(Action::AddResource),
            KeyCode::Char('m') => Some(Action::StartInput),
            KeyCode::Char(c @ '1'..='4') => Some(Action::GoToView(c as usize - '1' as usize)),
            _ => None,
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::InputCancel),
            KeyCode::Enter => Some(Action::InputSubmit),
            KeyCode::Backspace => Some(Action::InputBackspace),
            KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
            KeyCode::Left => Some(Action::Left),
            KeyCode::Right => Some(Action::Right),
            KeyCode::Char(c) => Some(Action::InputChar(c)),
            _ => None,
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::DialogConfirm),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::DialogCancel),
            KeyCode::Tab
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Char('h')
            | KeyCode::Char('l') => Some(Action::DialogSwitch),
            KeyCode::Enter => Some(Action::DialogExecute),
            _ => None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<Action> {
        if self.input_mode != InputMode::Normal {
            return None;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::Up),
            MouseEventKind::ScrollDown => Some(Action::Down),
            _ => None,
        }
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) -> Option<Action> {
        self.terminal_size = Some((width, height));
        Some(Action::Resize { width, height })
    }
}
