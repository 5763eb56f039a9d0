use zbus::{Result, proxy};
#[proxy(
    default_service = "org.arduino.x8h7rstd",
    interface = "org.arduino.x8h7rstd.reset",
    default_path = "/org/arduino/x8h7rstd/x8h7_reset"
)]
pub trait Reset {
    async fn read(&self) -> Result<String>;
    async fn write(&self, data: &str) -> Result<u64>;
}
