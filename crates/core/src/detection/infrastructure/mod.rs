pub mod annotated_feature_detector;
