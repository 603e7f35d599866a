mod activate;
mod add;
mod avg_pool2d;
mod batch_norm;
mod conv2d;
mod dense;
mod dropout;
mod flatten;

pub(crate) use activate::Activate;
pub(crate) use add::Add;
pub(crate) use avg_pool2d::AvgPool2d;
pub(crate) use batch_norm::BatchNorm;
pub(crate) use conv2d::Conv2d;
pub(crate) use dense::Dense;
pub(crate) use dropout::Dropout;
pub(crate) use flatten::Flatten;
