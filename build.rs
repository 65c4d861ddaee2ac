fn main() {
    println!("cargo:rerun-if-env-changed=WASHER_CONFIG");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
