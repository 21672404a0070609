use macroquad::prelude::*;

use crate::application::Command;

/// Panel button bound to a simulation command
#[derive(Clone)]
pub struct Button {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    text: String,
    command: Command,
    color: Color,
    hover_color: Color,
}

impl Button {
    pub fn new(x: f32, y: f32, width: f32, height: f32, text: impl Into<String>, command: Command) -> Self {
        Self {
            x,
            y,
            width,
            height,
            text: text.into(),
            command,
            color: Color::from_rgba(70, 130, 180, 255),
            hover_color: Color::from_rgba(100, 149, 237, 255),
        }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    /// Check if a point lies over the button
    pub fn contains(&self, pos: (f32, f32)) -> bool {
        pos.0 >= self.x
            && pos.0 <= self.x + self.width
            && pos.1 >= self.y
            && pos.1 <= self.y + self.height
    }

    /// Draw button with hover effect
    pub fn draw(&self, mouse_pos: (f32, f32)) {
        let color = if self.contains(mouse_pos) {
            self.hover_color
        } else {
            self.color
        };

        draw_rectangle(self.x, self.y, self.width, self.height, color);
        draw_rectangle_lines(self.x, self.y, self.width, self.height, 2.0, WHITE);

        let text_size = measure_text(&self.text, None, 20, 1.0);
        draw_text(
            &self.text,
            self.x + (self.width - text_size.width) / 2.0,
            self.y + (self.height + text_size.height) / 2.0,
            20.0,
            WHITE,
        );
    }

    /// Command to issue if the button was clicked this frame
    pub fn clicked(&self, mouse_pos: (f32, f32)) -> Option<Command> {
        (self.contains(mouse_pos) && is_mouse_button_pressed(MouseButton::Left))
            .then_some(self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges() {
        let button = Button::new(10.0, 20.0, 100.0, 40.0, "Clear", Command::Clear);
        assert!(button.contains((10.0, 20.0)));
        assert!(button.contains((110.0, 60.0)));
        assert!(!button.contains((9.9, 30.0)));
        assert!(!button.contains((50.0, 60.1)));
        assert_eq!(button.command(), Command::Clear);
    }
}
