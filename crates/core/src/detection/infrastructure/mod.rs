pub mod cascade_face_detector;
