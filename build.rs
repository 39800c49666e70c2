fn main() {
    // ESP-IDF link arguments and environment.  Host builds (tests) skip
    // this entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
