use crate::detection::domain::face_feature::FaceFeature;
use crate::shared::frame::Frame;
use crate::validation::domain::rejection::Rejection;

/// An accepted frame: the upright image and the face that passed.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub image: Frame,
    pub feature: FaceFeature,
}

/// Classification of one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationOutcome {
    Accepted(Detection),
    Rejected(Rejection),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            ValidationOutcome::Rejected(r) => Some(*r),
            ValidationOutcome::Accepted(_) => None,
        }
    }

    pub fn into_detection(self) -> Option<Detection> {
        match self {
            ValidationOutcome::Accepted(d) => Some(d),
            ValidationOutcome::Rejected(_) => None,
        }
    }
}
