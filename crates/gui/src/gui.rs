//! The GUI for the Xiangqi client, built with Iced.
//!
//! This file follows the Elm architecture, a Model-View-Update pattern:
//! - `XiangqiApp` is the Model: it holds the session and a handle to the server.
//! - `Message` is the Update trigger: clicks, button presses and server replies.
//! - `update` feeds each message to the session and performs whatever request
//!   it hands back.
//! - `view` renders the UI based on the current state.

use iced::{
    alignment, executor, mouse,
    theme,
    widget::{
        canvas::{self, event, Frame, Geometry, Path, Program, Stroke},
        text, Button, Column, Container, Row,
    },
    Application, Command, Element, Font, Length, Pixels, Point, Rectangle, Renderer, Settings,
    Size, Theme,
};
use std::sync::Arc;
use tracing::error;

use client::{
    config::Config,
    driver::{self, Completion, Request},
    position::{Pixel, Position},
    render::{BoardRenderer, Rgba, Scene, Surface},
    service::{GameService, HttpGameClient},
    session::Session,
    status::StatusClass,
};

const CHINESE_FONT: Font = Font::with_name("PingFang SC");

/// Runs the GUI application.
pub fn run(config: Config) -> iced::Result {
    XiangqiApp::run(Settings {
        window: iced::window::Settings {
            size: Size::new(700.0, 860.0),
            ..iced::window::Settings::default()
        },
        ..Settings::with_flags(config)
    })
}

/// Defines the messages that can be sent to the `update` function.
#[derive(Debug, Clone)]
pub enum Message {
    NewGame,
    AiMove,
    Refresh,
    BoardClicked(Position),
    Completed(Completion),
}

/// The main application state (the "Model").
struct XiangqiApp {
    session: Session,
    service: Arc<dyn GameService>,
    renderer: BoardRenderer,
}

// --- Application Logic ---

impl Application for XiangqiApp {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = Config;

    fn new(config: Config) -> (Self, Command<Message>) {
        let mut app = XiangqiApp {
            session: Session::new(config.game, config.ai_move_delay),
            service: Arc::new(HttpGameClient::new(config.server_url)),
            renderer: BoardRenderer::new(config.geometry),
        };
        // A game is started as soon as the window opens.
        let request = app.session.new_game();
        let command = app.dispatch(Some(request));
        (app, command)
    }

    fn title(&self) -> String {
        String::from("Xiangqi")
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        let request = match message {
            Message::NewGame => Some(self.session.new_game()),
            Message::AiMove => self.session.request_ai_move(),
            Message::Refresh => self.session.resync(),
            Message::BoardClicked(pos) => self.session.click(pos),
            Message::Completed(completion) => self.session.complete(completion),
        };
        self.dispatch(request)
    }

    fn view(&'_ self) -> Element<'_, Message> {
        let status = self.session.status();
        let status_text = text(&status.text)
            .size(Pixels(24.0))
            .style(theme::Text::Color(status_color(status.class)));

        let geometry = self.renderer.geometry();
        let canvas = canvas::Canvas::new(BoardCanvas::new(&self.session, &self.renderer))
            .width(Length::Fixed(geometry.width()))
            .height(Length::Fixed(geometry.height()));

        let mut ai_button = Button::new(text("AI Move"));
        if self.session.is_ai_turn_available() {
            ai_button = ai_button.on_press(Message::AiMove);
        }

        let mut refresh_button = Button::new(text("Refresh"));
        if !self.session.is_waiting() {
            refresh_button = refresh_button.on_press(Message::Refresh);
        }

        let controls = Row::new()
            .spacing(10)
            .push(Button::new(text("New Game")).on_press(Message::NewGame))
            .push(ai_button)
            .push(refresh_button);

        let captured: String = self
            .session
            .snapshot()
            .map(|snapshot| snapshot.captured.iter().filter_map(|piece| piece.glyph()).collect())
            .unwrap_or_default();

        let content = Column::new()
            .spacing(20)
            .align_items(iced::Alignment::Center)
            .push(status_text)
            .push(canvas)
            .push(controls)
            .push(text(captured).font(CHINESE_FONT).size(Pixels(20.0)));

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .into()
    }
}

// --- Update Helper Functions ---

impl XiangqiApp {
    /// Performs `request` in the background; its reply comes back as `Message::Completed`.
    fn dispatch(&self, request: Option<Request>) -> Command<Message> {
        match request {
            Some(request) => {
                let service = Arc::clone(&self.service);
                Command::perform(
                    async move { driver::perform(service.as_ref(), request).await },
                    Message::Completed,
                )
            }
            None => Command::none(),
        }
    }
}

fn status_color(class: StatusClass) -> iced::Color {
    match class {
        StatusClass::Normal => iced::Color::from_rgb8(0, 0, 0),
        StatusClass::Check => iced::Color::from_rgb8(230, 120, 0),
        StatusClass::Checkmate => iced::Color::from_rgb8(200, 0, 0),
        StatusClass::Stalemate => iced::Color::from_rgb8(110, 110, 110),
    }
}

// --- Canvas Drawing Logic ---

struct BoardCanvas<'a> {
    session: &'a Session,
    renderer: &'a BoardRenderer,
}

impl<'a> BoardCanvas<'a> {
    fn new(session: &'a Session, renderer: &'a BoardRenderer) -> Self {
        Self { session, renderer }
    }
}

impl<'a> Program<Message> for BoardCanvas<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let scene = Scene::from(self.session);
        if let Err(err) = self.renderer.render(&mut FrameSurface { frame: &mut frame }, &scene) {
            error!("cannot draw board: {err}");
        }
        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        _state: &mut Self::State,
        event: event::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        if let event::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event {
            if let Some(point) = cursor.position_in(bounds) {
                if let Some(pos) = self.renderer.geometry().pixel_to_board(point.x, point.y) {
                    return (event::Status::Captured, Some(Message::BoardClicked(pos)));
                }
            }
        }
        (event::Status::Ignored, None)
    }
}

// --- Canvas Drawing Helper Functions ---

/// Lets the board renderer draw into an Iced canvas frame.
struct FrameSurface<'a> {
    frame: &'a mut Frame,
}

fn to_point(pixel: Pixel) -> Point {
    Point::new(pixel.x, pixel.y)
}

fn to_color(color: Rgba) -> iced::Color {
    iced::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

impl Surface for FrameSurface<'_> {
    fn fill_rect(&mut self, top_left: Pixel, width: f32, height: f32, color: Rgba) {
        let path = Path::rectangle(to_point(top_left), Size::new(width, height));
        self.frame.fill(&path, to_color(color));
    }

    fn fill_circle(&mut self, center: Pixel, radius: f32, color: Rgba) {
        let path = Path::circle(to_point(center), radius);
        self.frame.fill(&path, to_color(color));
    }

    fn stroke_line(&mut self, from: Pixel, to: Pixel, width: f32, color: Rgba) {
        let path = Path::line(to_point(from), to_point(to));
        self.frame.stroke(
            &path,
            Stroke::default().with_width(width).with_color(to_color(color)),
        );
    }

    fn fill_text(&mut self, content: &str, center: Pixel, size: f32, color: Rgba) {
        self.frame.fill_text(canvas::Text {
            content: content.to_string(),
            position: to_point(center),
            color: to_color(color),
            size: Pixels(size),
            font: CHINESE_FONT,
            horizontal_alignment: alignment::Horizontal::Center,
            vertical_alignment: alignment::Vertical::Center,
            line_height: iced::widget::text::LineHeight::default(),
            shaping: iced::widget::text::Shaping::Advanced,
        });
    }
}
