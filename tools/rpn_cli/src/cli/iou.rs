use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use ndarray::{Array2, ArrayBase, ArrayD, ArrayViewD, Data, Dimension};
use serde_json::{json, Value};

use super::BoxArg;

/// Coordinate convention of the boxes passed to `rpn iou`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `cx,cy,w,h`
    Center,
    /// `x_min,y_min,x_max,y_max`
    Corner,
}

/// Print the IoU of every box in the first set with every box in the second set.
///
/// The result is squeezed: two single boxes print a number, a single box against a set prints
/// a list.
#[derive(Parser, Debug)]
pub struct Iou {
    #[clap(long, value_enum, default_value_t = Format::Center)]
    pub format: Format,

    #[clap(long, num_args = 1.., required = true)]
    pub set1: Vec<BoxArg>,

    #[clap(long, num_args = 1.., required = true)]
    pub set2: Vec<BoxArg>,
}

fn box_set(boxes: &[BoxArg]) -> Array2<f32> {
    Array2::from_shape_fn((boxes.len(), 4), |(i, j)| boxes[i].0[j])
}

/// Nested JSON lists for an array of any dimensionality, a plain number for a scalar.
pub fn to_json(values: ArrayViewD<'_, f32>) -> Value {
    if values.ndim() == 0 {
        return json!(values.first());
    }

    Value::Array(values.outer_iter().map(to_json).collect())
}

impl Iou {
    pub fn iou(self) -> Result<()> {
        let set1 = box_set(&self.set1);
        let set2 = box_set(&self.set2);

        // single boxes are passed as 1-D arrays so the result squeezes like the library does
        let iou = match (self.set1.len(), self.set2.len()) {
            (1, 1) => self.compute(&set1.row(0), &set2.row(0))?,
            (1, _) => self.compute(&set1.row(0), &set2)?,
            (_, 1) => self.compute(&set1, &set2.row(0))?,
            _ => self.compute(&set1, &set2)?,
        };

        println!("{}", serde_json::to_string(&to_json(iou.view())).into_diagnostic()?);

        Ok(())
    }

    fn compute<S1, S2, D1, D2>(
        &self,
        set1: &ArrayBase<S1, D1>,
        set2: &ArrayBase<S2, D2>,
    ) -> rpn::error::Result<ArrayD<f32>>
    where
        S1: Data<Elem = f32>,
        S2: Data<Elem = f32>,
        D1: Dimension,
        D2: Dimension,
    {
        match self.format {
            Format::Center => rpn::iou::iou_center_form(set1, set2),
            Format::Corner => rpn::iou::iou_corner_form(set1, set2),
        }
    }
}
