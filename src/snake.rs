use std::collections::VecDeque;

use crate::Cell;
use Heading::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right
}

impl Heading {
    /// Unit step on the grid, y grows downwards.
    pub fn offset(self) -> Cell {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn reverse(self) -> Heading {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// Occupied cells, head first, plus the heading used for the next step.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    heading: Heading,
}

impl Snake {
    pub fn new(pos: Cell, heading: Heading) -> Self {
        let mut body = VecDeque::new();
        body.push_back(pos);
        Snake { body, heading }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn next_head(&self) -> Cell {
        let head = self.head();
        let diff = self.heading.offset();
        (head.0 + diff.0, head.1 + diff.1)
    }

    /// Shifts one cell along the heading, keeping the length. Bounds are the caller's problem.
    pub fn move_step(&mut self) {
        self.grow();
        self.body.pop_back();
    }

    /// Like `move_step`, but the tail stays put.
    pub fn grow(&mut self) {
        let new_head = self.next_head();
        self.body.push_front(new_head);
    }

    /// Ignores a 180° turn and reports whether the heading was accepted.
    pub fn set_heading(&mut self, heading: Heading) -> bool {
        if heading == self.heading.reverse() {
            return false;
        }

        self.heading = heading;
        true
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    #[cfg(test)]
    pub fn from_cells(cells: &[Cell], heading: Heading) -> Self {
        Snake { body: cells.iter().copied().collect(), heading }
    }

    /// True when the head sits on any other segment.
    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(snake: &Snake) -> Vec<Cell> {
        snake.body().iter().copied().collect()
    }

    #[test]
    fn move_step_shifts_without_changing_length() {
        let mut snake = Snake::from_cells(&[(2, 2), (1, 2), (0, 2)], Right);
        snake.move_step();

        assert_eq!(cells(&snake), vec![(3, 2), (2, 2), (1, 2)]);
    }

    #[test]
    fn grow_keeps_the_tail() {
        let mut snake = Snake::new((2, 2), Up);
        snake.grow();

        assert_eq!(cells(&snake), vec![(2, 1), (2, 2)]);
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn new_head_is_adjacent_in_heading_direction() {
        for &heading in &[Up, Down, Left, Right] {
            let mut snake = Snake::new((5, 5), heading);
            let old_head = snake.head();
            snake.move_step();
            let new_head = snake.head();
            let offset = heading.offset();

            assert_eq!((new_head.0 - old_head.0, new_head.1 - old_head.1), offset);
            assert_eq!(offset.0.abs() + offset.1.abs(), 1);
        }
    }

    #[test]
    fn moving_off_the_grid_is_not_checked_here() {
        let mut snake = Snake::new((0, 0), Left);
        snake.move_step();

        assert_eq!(snake.head(), (-1, 0));
    }

    #[test]
    fn reverse_heading_is_rejected() {
        let mut snake = Snake::from_cells(&[(2, 2), (2, 3), (2, 4)], Up);

        assert!(!snake.set_heading(Down));
        assert_eq!(snake.heading(), Up);
    }

    #[test]
    fn reverse_is_rejected_for_every_heading() {
        for &heading in &[Up, Down, Left, Right] {
            let mut snake = Snake::new((3, 3), heading);

            assert!(!snake.set_heading(heading.reverse()));
            assert_eq!(snake.heading(), heading);
        }
    }

    #[test]
    fn perpendicular_and_same_headings_are_accepted() {
        let mut snake = Snake::new((3, 3), Right);

        assert!(snake.set_heading(Right));
        assert!(snake.set_heading(Down));
        assert_eq!(snake.heading(), Down);
        assert!(snake.set_heading(Left));
        assert_eq!(snake.heading(), Left);
    }

    #[test]
    fn heading_change_only_applies_on_next_step() {
        let mut snake = Snake::new((3, 3), Right);
        snake.set_heading(Down);

        assert_eq!(snake.head(), (3, 3));
        snake.move_step();
        assert_eq!(snake.head(), (3, 4));
    }

    #[test]
    fn detects_self_bite() {
        let snake = Snake::from_cells(&[(1, 1), (2, 1), (2, 2), (1, 2), (1, 1)], Up);
        assert!(snake.bites_itself());

        let snake = Snake::from_cells(&[(1, 1), (2, 1), (2, 2)], Up);
        assert!(!snake.bites_itself());
    }

    #[test]
    fn head_may_follow_the_vacated_tail() {
        // Square loop: the head steps into the cell the tail leaves on the same tick
        let mut snake = Snake::from_cells(&[(1, 2), (2, 2), (2, 1), (1, 1)], Up);
        snake.move_step();

        assert_eq!(cells(&snake), vec![(1, 1), (1, 2), (2, 2), (2, 1)]);
        assert!(!snake.bites_itself());
    }
}
