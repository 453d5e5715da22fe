//! Two-column sensor grid.

use serde::Serialize;

use crate::config::SensorType;

/// Sensors split over the grid. An odd sensor out spans both columns below them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorLayout<T> {
    pub left: Vec<T>,
    pub right: Vec<T>,
    pub full_width: Option<T>,
}

impl<T> Default for SensorLayout<T> {
    fn default() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
            full_width: None,
        }
    }
}

impl<T> SensorLayout<T> {
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len() + usize::from(self.full_width.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> SensorLayout<U> {
        SensorLayout {
            left: self.left.into_iter().map(&mut f).collect(),
            right: self.right.into_iter().map(&mut f).collect(),
            full_width: self.full_width.map(f),
        }
    }
}

/// Lay out `sensors`, given as `(type, order, item)`.
///
/// Sorted by order, then type name. Items alternate left and right; with an odd count the
/// last one goes full width.
pub fn layout<T>(sensors: impl IntoIterator<Item = (SensorType, u8, T)>) -> SensorLayout<T> {
    let mut sorted: Vec<(SensorType, u8, T)> = sensors.into_iter().collect();
    sorted.sort_by(|(ta, oa, _), (tb, ob, _)| {
        oa.cmp(ob).then_with(|| ta.as_ref().cmp(tb.as_ref()))
    });

    let count = sorted.len();
    let mut grid = SensorLayout::default();
    for (index, (_, _, item)) in sorted.into_iter().enumerate() {
        if index % 2 == 1 {
            grid.right.push(item);
        } else if index == count - 1 {
            grid.full_width = Some(item);
        } else {
            grid.left.push(item);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn all_sensors(count: usize) -> Vec<(SensorType, u8, SensorType)> {
        SensorType::iter()
            .take(count)
            .enumerate()
            .map(|(i, s)| (s, i as u8 + 1, s))
            .collect()
    }

    #[test]
    fn test_five_sensors() {
        let grid = layout(all_sensors(5));
        assert_eq!(
            grid,
            SensorLayout {
                left: vec![SensorType::Light, SensorType::Temperature],
                right: vec![SensorType::Moisture, SensorType::Salinity],
                full_width: Some(SensorType::Nutrition),
            }
        );
    }

    #[test]
    fn test_four_sensors() {
        let grid = layout(all_sensors(4));
        assert_eq!((grid.left.len(), grid.right.len()), (2, 2));
        assert_eq!(grid.full_width, None);
    }

    #[test]
    fn test_one_and_none() {
        let grid = layout(all_sensors(1));
        assert!(grid.left.is_empty());
        assert_eq!(grid.full_width, Some(SensorType::Light));

        let grid = layout(Vec::<(SensorType, u8, ())>::new());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_sorts_by_order_then_name() {
        let grid = layout(vec![
            (SensorType::Temperature, 1, "t"),
            (SensorType::Light, 2, "l"),
            (SensorType::Moisture, 1, "m"),
        ]);
        assert_eq!(grid.left, vec!["m"]);
        assert_eq!(grid.right, vec!["t"]);
        assert_eq!(grid.full_width, Some("l"));
        assert_eq!(grid.map(str::len).len(), 3);
    }
}
